//! Booking workflow — the four-stage appointment wizard.
//!
//! A strictly linear state machine: SelectProvider → SelectSchedule →
//! ConfirmAndPay → Success. `back()` steps to the immediately preceding
//! stage only; there is no skipping forward. Selections are captured per
//! stage and validated before advancement, and the confirmed appointment
//! is committed to the store in a single `add_appointment` write.
//!
//! A doctor with an empty slot list dead-ends the schedule stage: no slot
//! can ever be selected, so the only way out is `back()`.

use rusqlite::Connection;
use uuid::Uuid;

use crate::db::{self, DatabaseError};
use crate::models::{
    Appointment, AppointmentStatus, Doctor, PaymentStatus, User, VisitType,
};
use crate::payment::{CancelToken, ChargeRequest, PaymentError, PaymentGateway};

/// One stage of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStep {
    SelectProvider,
    SelectSchedule,
    ConfirmAndPay,
    Success,
}

impl std::fmt::Display for BookingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelectProvider => write!(f, "select provider"),
            Self::SelectSchedule => write!(f, "select schedule"),
            Self::ConfirmAndPay => write!(f, "confirm and pay"),
            Self::Success => write!(f, "success"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("no doctor selected")]
    NoDoctorSelected,

    #[error("date and time slot must both be set")]
    ScheduleIncomplete,

    #[error("slot {0:?} is not offered by the selected doctor")]
    SlotNotOffered(String),

    #[error("action not available at the {0} step")]
    InvalidStep(BookingStep),

    #[error("a confirmation is already processing")]
    AlreadyProcessing,

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Wizard state for one booking attempt by one patient.
pub struct BookingFlow {
    patient: User,
    step: BookingStep,
    doctor: Option<Doctor>,
    date: Option<chrono::NaiveDate>,
    slot: Option<String>,
    visit_type: VisitType,
    /// Set while a confirmation is in flight; mirrors the disabled submit
    /// control that guards against duplicate submission.
    processing: bool,
}

impl BookingFlow {
    pub fn new(patient: User) -> Self {
        Self {
            patient,
            step: BookingStep::SelectProvider,
            doctor: None,
            date: None,
            slot: None,
            visit_type: VisitType::default(),
            processing: false,
        }
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn selected_doctor(&self) -> Option<&Doctor> {
        self.doctor.as_ref()
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    // ── Stage 1: provider ───────────────────────────────────

    /// Choose (or re-choose) the doctor. Re-selection clears any slot
    /// carried over from a previous choice, since slots belong to the
    /// doctor offering them.
    pub fn select_doctor(&mut self, doctor: Doctor) -> Result<(), BookingError> {
        if self.step != BookingStep::SelectProvider {
            return Err(BookingError::InvalidStep(self.step));
        }
        if self.doctor.as_ref().map(|d| d.id.as_str()) != Some(doctor.id.as_str()) {
            self.slot = None;
        }
        self.doctor = Some(doctor);
        Ok(())
    }

    // ── Stage 2: schedule ───────────────────────────────────

    pub fn select_date(&mut self, date: chrono::NaiveDate) -> Result<(), BookingError> {
        if self.step != BookingStep::SelectSchedule {
            return Err(BookingError::InvalidStep(self.step));
        }
        self.date = Some(date);
        Ok(())
    }

    /// Choose a time slot. The slot must be one the selected doctor
    /// offers; a doctor with no slots makes this stage uncompletable.
    pub fn select_slot(&mut self, slot: &str) -> Result<(), BookingError> {
        if self.step != BookingStep::SelectSchedule {
            return Err(BookingError::InvalidStep(self.step));
        }
        let doctor = self.doctor.as_ref().ok_or(BookingError::NoDoctorSelected)?;
        if !doctor.available_slots.iter().any(|s| s == slot) {
            return Err(BookingError::SlotNotOffered(slot.to_string()));
        }
        self.slot = Some(slot.to_string());
        Ok(())
    }

    pub fn set_visit_type(&mut self, visit_type: VisitType) -> Result<(), BookingError> {
        if self.step != BookingStep::SelectSchedule {
            return Err(BookingError::InvalidStep(self.step));
        }
        self.visit_type = visit_type;
        Ok(())
    }

    // ── Navigation ──────────────────────────────────────────

    /// Move forward one stage if the current stage's guard is satisfied.
    /// ConfirmAndPay advances only through `confirm`.
    pub fn advance(&mut self) -> Result<BookingStep, BookingError> {
        self.step = match self.step {
            BookingStep::SelectProvider => {
                if self.doctor.is_none() {
                    return Err(BookingError::NoDoctorSelected);
                }
                BookingStep::SelectSchedule
            }
            BookingStep::SelectSchedule => {
                if self.date.is_none() || self.slot.is_none() {
                    return Err(BookingError::ScheduleIncomplete);
                }
                BookingStep::ConfirmAndPay
            }
            BookingStep::ConfirmAndPay | BookingStep::Success => {
                return Err(BookingError::InvalidStep(self.step));
            }
        };
        Ok(self.step)
    }

    /// Step back to the immediately preceding stage. Success is terminal
    /// and the first stage has nowhere to go.
    pub fn back(&mut self) -> Result<BookingStep, BookingError> {
        if self.processing {
            return Err(BookingError::AlreadyProcessing);
        }
        self.step = match self.step {
            BookingStep::SelectSchedule => BookingStep::SelectProvider,
            BookingStep::ConfirmAndPay => BookingStep::SelectSchedule,
            BookingStep::SelectProvider | BookingStep::Success => {
                return Err(BookingError::InvalidStep(self.step));
            }
        };
        Ok(self.step)
    }

    // ── Stage 3: commit ─────────────────────────────────────

    /// Charge the gateway and commit the appointment.
    ///
    /// On success the flow advances to the terminal Success stage and the
    /// created record is returned. On a declined or cancelled charge the
    /// flow stays at ConfirmAndPay with the processing flag cleared, so
    /// the patient can retry or go back; nothing is written to the store.
    pub async fn confirm<G: PaymentGateway>(
        &mut self,
        conn: &Connection,
        gateway: &G,
        cancel: CancelToken,
    ) -> Result<Appointment, BookingError> {
        if self.step != BookingStep::ConfirmAndPay {
            return Err(BookingError::InvalidStep(self.step));
        }
        if self.processing {
            return Err(BookingError::AlreadyProcessing);
        }
        let doctor = self.doctor.clone().ok_or(BookingError::NoDoctorSelected)?;
        let (date, slot) = match (self.date, self.slot.clone()) {
            (Some(date), Some(slot)) => (date, slot),
            _ => return Err(BookingError::ScheduleIncomplete),
        };

        self.processing = true;
        let charge = gateway
            .charge(
                ChargeRequest {
                    amount: doctor.fee,
                    reference: format!("Consultation with {}", doctor.name),
                },
                cancel,
            )
            .await;

        let receipt = match charge {
            Ok(receipt) => receipt,
            Err(e) => {
                self.processing = false;
                tracing::warn!(error = %e, "Booking confirmation failed at payment");
                return Err(e.into());
            }
        };

        let appointment = Appointment {
            id: Uuid::new_v4().to_string(),
            patient_id: self.patient.id.clone(),
            doctor_id: doctor.id.clone(),
            patient_name: self.patient.name.clone(),
            doctor_name: doctor.name.clone(),
            date,
            time_slot: slot,
            status: AppointmentStatus::Pending,
            visit_type: self.visit_type,
            notes: None,
            payment_status: PaymentStatus::Paid,
            amount: receipt.amount,
        };

        if let Err(e) = db::add_appointment(conn, &appointment) {
            self.processing = false;
            return Err(e.into());
        }

        self.processing = false;
        self.step = BookingStep::Success;
        tracing::info!(
            appointment_id = %appointment.id,
            doctor = %appointment.doctor_name,
            "Booking confirmed"
        );
        Ok(appointment)
    }
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
