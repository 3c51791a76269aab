//! First-run defaults for every collection.
//!
//! Reads fall back to these whenever a collection key has never been
//! written; they are persisted only once a mutation rewrites the
//! collection. The admin account is static and never stored.

use chrono::{Days, Local};

use crate::models::{
    Appointment, AppointmentStatus, Doctor, Patient, PaymentStatus, User, UserRole, VisitType,
};

pub fn doctors() -> Vec<Doctor> {
    vec![
        Doctor {
            id: "d1".into(),
            name: "Dr. Sarah Wilson".into(),
            email: "sarah@careconnect.com".into(),
            role: UserRole::Doctor,
            specialization: "Cardiology".into(),
            experience_years: 12,
            fee: 150.0,
            available_slots: vec![
                "09:00".into(),
                "10:00".into(),
                "11:00".into(),
                "14:00".into(),
                "15:00".into(),
            ],
            bio: "Expert cardiologist with over a decade of experience in treating heart diseases."
                .into(),
            rating: 4.9,
            patients_count: 1200,
            avatar_url: Some("https://picsum.photos/200/200?random=1".into()),
        },
        Doctor {
            id: "d2".into(),
            name: "Dr. James Chen".into(),
            email: "james@careconnect.com".into(),
            role: UserRole::Doctor,
            specialization: "Neurology".into(),
            experience_years: 8,
            fee: 180.0,
            available_slots: vec![
                "10:00".into(),
                "11:30".into(),
                "14:30".into(),
                "16:00".into(),
            ],
            bio: "Specialist in neurological disorders and brain health.".into(),
            rating: 4.8,
            patients_count: 850,
            avatar_url: Some("https://picsum.photos/200/200?random=2".into()),
        },
        Doctor {
            id: "d3".into(),
            name: "Dr. Emily Carter".into(),
            email: "emily@careconnect.com".into(),
            role: UserRole::Doctor,
            specialization: "Pediatrics".into(),
            experience_years: 5,
            fee: 100.0,
            available_slots: vec![
                "08:30".into(),
                "09:30".into(),
                "10:30".into(),
                "13:00".into(),
                "14:00".into(),
            ],
            bio: "Compassionate pediatrician dedicated to child wellness.".into(),
            rating: 4.95,
            patients_count: 2100,
            avatar_url: Some("https://picsum.photos/200/200?random=3".into()),
        },
    ]
}

pub fn patients() -> Vec<Patient> {
    vec![Patient {
        id: "p1".into(),
        name: "John Doe".into(),
        email: "john@gmail.com".into(),
        role: UserRole::Patient,
        dob: "1985-04-12".into(),
        blood_group: "O+".into(),
        address: "123 Main St, Springfield".into(),
        medical_history: vec!["Hypertension".into(), "Seasonal Allergies".into()],
        avatar_url: Some("https://picsum.photos/200/200?random=4".into()),
    }]
}

/// The single admin account. Static: email lookup checks it first, but it
/// never lives in the kv store.
pub fn admin() -> User {
    User {
        id: "a1".into(),
        name: "Admin User".into(),
        email: "admin@careconnect.com".into(),
        role: UserRole::Admin,
        avatar_url: Some("https://picsum.photos/200/200?random=5".into()),
    }
}

pub fn appointments() -> Vec<Appointment> {
    let today = Local::now().date_naive();
    let tomorrow = today
        .checked_add_days(Days::new(1))
        .unwrap_or(today);
    vec![
        Appointment {
            id: "appt1".into(),
            patient_id: "p1".into(),
            doctor_id: "d1".into(),
            patient_name: "John Doe".into(),
            doctor_name: "Dr. Sarah Wilson".into(),
            date: today,
            time_slot: "10:00".into(),
            status: AppointmentStatus::Confirmed,
            visit_type: VisitType::Video,
            notes: None,
            payment_status: PaymentStatus::Paid,
            amount: 150.0,
        },
        Appointment {
            id: "appt2".into(),
            patient_id: "p1".into(),
            doctor_id: "d2".into(),
            patient_name: "John Doe".into(),
            doctor_name: "Dr. James Chen".into(),
            date: tomorrow,
            time_slot: "14:30".into(),
            status: AppointmentStatus::Pending,
            visit_type: VisitType::InPerson,
            notes: None,
            payment_status: PaymentStatus::Unpaid,
            amount: 180.0,
        },
    ]
}
