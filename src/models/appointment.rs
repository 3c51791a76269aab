use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::{AppointmentStatus, PaymentStatus, VisitType};

/// A booked appointment.
///
/// `patient_name` and `doctor_name` are deliberate snapshots taken at
/// creation time and are never resynchronized if the referenced record is
/// later renamed. Dashboards display them as-is; anything that needs the
/// current name must resolve the id against the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub patient_name: String,
    pub doctor_name: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub status: AppointmentStatus,
    #[serde(rename = "type")]
    pub visit_type: VisitType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub payment_status: PaymentStatus,
    pub amount: f64,
}
