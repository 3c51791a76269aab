//! Role portals.
//!
//! One variant per account role, resolved exactly once from the session
//! user at the routing boundary. Each portal exposes only the operations
//! its role may perform; nothing downstream switches on the role tag
//! again.

use rusqlite::Connection;

use crate::booking::BookingFlow;
use crate::db::{self, DatabaseError};
use crate::models::{
    Appointment, AppointmentStatus, Doctor, NewDoctor, Patient, User, UserRole,
};
use crate::reports::{self, ReportStats};

/// The resolved role surface for a logged-in user.
pub enum Portal {
    Admin(AdminPortal),
    Doctor(DoctorPortal),
    Patient(PatientPortal),
}

impl Portal {
    pub fn for_user(user: &User) -> Portal {
        match user.role {
            UserRole::Admin => Portal::Admin(AdminPortal { user: user.clone() }),
            UserRole::Doctor => Portal::Doctor(DoctorPortal { user: user.clone() }),
            UserRole::Patient => Portal::Patient(PatientPortal { user: user.clone() }),
        }
    }

    pub fn user(&self) -> &User {
        match self {
            Portal::Admin(p) => &p.user,
            Portal::Doctor(p) => &p.user,
            Portal::Patient(p) => &p.user,
        }
    }
}

// ─── Admin ────────────────────────────────────────────────────────────────────

pub struct AdminPortal {
    user: User,
}

impl AdminPortal {
    /// Aggregate statistics over the whole store.
    pub fn stats(&self, conn: &Connection) -> Result<ReportStats, DatabaseError> {
        reports::gather_stats(conn)
    }

    pub fn add_doctor(
        &self,
        conn: &Connection,
        new_doctor: NewDoctor,
    ) -> Result<Doctor, DatabaseError> {
        db::add_doctor(conn, new_doctor)
    }

    pub fn remove_doctor(&self, conn: &Connection, id: &str) -> Result<bool, DatabaseError> {
        db::delete_doctor(conn, id)
    }
}

// ─── Doctor ───────────────────────────────────────────────────────────────────

/// A doctor's decision on a pending appointment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestDecision {
    Accept,
    Decline,
}

pub struct DoctorPortal {
    user: User,
}

impl DoctorPortal {
    /// All appointments addressed to this doctor, in store order.
    pub fn appointments(&self, conn: &Connection) -> Result<Vec<Appointment>, DatabaseError> {
        Ok(db::get_appointments(conn)?
            .into_iter()
            .filter(|a| a.doctor_id == self.user.id)
            .collect())
    }

    /// Requests awaiting an accept/decline decision.
    pub fn pending_requests(&self, conn: &Connection) -> Result<Vec<Appointment>, DatabaseError> {
        Ok(self
            .appointments(conn)?
            .into_iter()
            .filter(|a| a.status == AppointmentStatus::Pending)
            .collect())
    }

    /// Confirmed appointments on the given date (the dashboard's "today").
    pub fn confirmed_on(
        &self,
        conn: &Connection,
        date: chrono::NaiveDate,
    ) -> Result<Vec<Appointment>, DatabaseError> {
        Ok(self
            .appointments(conn)?
            .into_iter()
            .filter(|a| a.date == date && a.status == AppointmentStatus::Confirmed)
            .collect())
    }

    /// Accept or decline a request. Writes only the status field.
    pub fn respond(
        &self,
        conn: &Connection,
        appointment_id: &str,
        decision: RequestDecision,
    ) -> Result<(), DatabaseError> {
        let status = match decision {
            RequestDecision::Accept => AppointmentStatus::Confirmed,
            RequestDecision::Decline => AppointmentStatus::Declined,
        };
        db::update_appointment_status(conn, appointment_id, status)
    }
}

// ─── Patient ──────────────────────────────────────────────────────────────────

pub struct PatientPortal {
    user: User,
}

impl PatientPortal {
    /// All appointments this patient has booked, in store order.
    pub fn appointments(&self, conn: &Connection) -> Result<Vec<Appointment>, DatabaseError> {
        Ok(db::get_appointments(conn)?
            .into_iter()
            .filter(|a| a.patient_id == self.user.id)
            .collect())
    }

    /// The full patient record, if it still exists in the store.
    pub fn profile(&self, conn: &Connection) -> Result<Option<Patient>, DatabaseError> {
        db::get_patient_by_id(conn, &self.user.id)
    }

    pub fn add_history_entry(
        &self,
        conn: &Connection,
        entry: &str,
    ) -> Result<Patient, DatabaseError> {
        db::add_history_entry(conn, &self.user.id, entry)
    }

    pub fn remove_history_entry(
        &self,
        conn: &Connection,
        index: usize,
    ) -> Result<Patient, DatabaseError> {
        db::remove_history_entry(conn, &self.user.id, index)
    }

    /// Begin the booking wizard for this patient.
    pub fn start_booking(&self) -> BookingFlow {
        BookingFlow::new(self.user.clone())
    }
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
