//! Read-only aggregation for the admin dashboard.
//!
//! Sums and counts over the store; never mutates. Revenue counts paid
//! appointments only, so unpaid pending requests do not inflate it.

use std::collections::BTreeMap;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::{self, DatabaseError};
use crate::models::PaymentStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    /// Month key, YYYY-MM.
    pub month: String,
    pub appointments: u32,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportStats {
    pub total_patients: usize,
    pub total_doctors: usize,
    pub total_appointments: usize,
    pub revenue: f64,
    /// Chronologically ordered per-month series.
    pub monthly: Vec<MonthlyPoint>,
}

pub fn gather_stats(conn: &Connection) -> Result<ReportStats, DatabaseError> {
    let doctors = db::get_doctors(conn)?;
    let patients = db::get_patients(conn)?;
    let appointments = db::get_appointments(conn)?;

    let revenue = appointments
        .iter()
        .filter(|a| a.payment_status == PaymentStatus::Paid)
        .map(|a| a.amount)
        .sum();

    let mut by_month: BTreeMap<String, MonthlyPoint> = BTreeMap::new();
    for appointment in &appointments {
        let key = appointment.date.format("%Y-%m").to_string();
        let point = by_month.entry(key.clone()).or_insert(MonthlyPoint {
            month: key,
            appointments: 0,
            revenue: 0.0,
        });
        point.appointments += 1;
        if appointment.payment_status == PaymentStatus::Paid {
            point.revenue += appointment.amount;
        }
    }

    Ok(ReportStats {
        total_patients: patients.len(),
        total_doctors: doctors.len(),
        total_appointments: appointments.len(),
        revenue,
        monthly: by_month.into_values().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::{Appointment, AppointmentStatus, VisitType};
    use chrono::NaiveDate;

    fn paid_appointment(id: &str, date: NaiveDate, amount: f64) -> Appointment {
        Appointment {
            id: id.into(),
            patient_id: "p1".into(),
            doctor_id: "d1".into(),
            patient_name: "John Doe".into(),
            doctor_name: "Dr. Sarah Wilson".into(),
            date,
            time_slot: "10:00".into(),
            status: AppointmentStatus::Confirmed,
            visit_type: VisitType::InPerson,
            notes: None,
            payment_status: PaymentStatus::Paid,
            amount,
        }
    }

    #[test]
    fn revenue_counts_paid_amounts_only() {
        let conn = open_memory_database().unwrap();
        // Seed: one paid appointment at 150, one unpaid at 180
        let stats = gather_stats(&conn).unwrap();
        assert_eq!(stats.total_doctors, 3);
        assert_eq!(stats.total_patients, 1);
        assert_eq!(stats.total_appointments, 2);
        assert_eq!(stats.revenue, 150.0);
    }

    #[test]
    fn monthly_series_groups_and_sorts_by_month() {
        let conn = open_memory_database().unwrap();
        let jan = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let mar = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        db::add_appointment(&conn, &paid_appointment("r1", mar, 100.0)).unwrap();
        db::add_appointment(&conn, &paid_appointment("r2", jan, 150.0)).unwrap();
        db::add_appointment(&conn, &paid_appointment("r3", jan, 150.0)).unwrap();

        let stats = gather_stats(&conn).unwrap();
        let jan_point = stats
            .monthly
            .iter()
            .find(|p| p.month == "2026-01")
            .unwrap();
        assert_eq!(jan_point.appointments, 2);
        assert_eq!(jan_point.revenue, 300.0);

        // Chronological order
        let months: Vec<&str> = stats.monthly.iter().map(|p| p.month.as_str()).collect();
        let mut sorted = months.clone();
        sorted.sort();
        assert_eq!(months, sorted);
    }

    #[test]
    fn stats_never_mutate_the_store() {
        let conn = open_memory_database().unwrap();
        gather_stats(&conn).unwrap();
        // No collection key was written by aggregation
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
