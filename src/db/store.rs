//! Persistence store — key-addressed record collections.
//!
//! Three collections (doctors, patients, appointments) each live under a
//! fixed key as one JSON array, plus a `session` key holding the logged-in
//! user. Reads re-derive from the kv table on every call (no in-memory
//! cache); reads on a never-written key fall back to `seed` defaults.
//! Every mutation rewrites the whole affected collection.
//!
//! Missing-id mutations return `DatabaseError::NotFound` rather than
//! silently no-opping, so callers can tell an update apart from a drop.

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use super::{seed, DatabaseError};
use crate::models::{
    Appointment, AppointmentStatus, Doctor, NewDoctor, Patient, User, UserRole,
};

pub const DOCTORS_KEY: &str = "doctors";
pub const PATIENTS_KEY: &str = "patients";
pub const APPOINTMENTS_KEY: &str = "appointments";
pub const SESSION_KEY: &str = "session";

// ─── kv primitives ────────────────────────────────────────────────────────────

fn read_key(conn: &Connection, key: &str) -> Result<Option<String>, DatabaseError> {
    conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
        row.get(0)
    })
    .optional()
    .map_err(DatabaseError::from)
}

fn write_key(conn: &Connection, key: &str, value: &str) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

fn delete_key(conn: &Connection, key: &str) -> Result<bool, DatabaseError> {
    let removed = conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
    Ok(removed > 0)
}

/// Load a collection, falling back to seed data when the key has never
/// been written. Malformed stored JSON propagates as `Serialization`.
fn load_collection<T: DeserializeOwned>(
    conn: &Connection,
    key: &str,
    default: fn() -> Vec<T>,
) -> Result<Vec<T>, DatabaseError> {
    match read_key(conn, key)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(default()),
    }
}

fn save_collection<T: Serialize>(
    conn: &Connection,
    key: &str,
    records: &[T],
) -> Result<(), DatabaseError> {
    write_key(conn, key, &serde_json::to_string(records)?)
}

// ─── Doctors ──────────────────────────────────────────────────────────────────

pub fn get_doctors(conn: &Connection) -> Result<Vec<Doctor>, DatabaseError> {
    load_collection(conn, DOCTORS_KEY, seed::doctors)
}

pub fn get_doctor_by_id(conn: &Connection, id: &str) -> Result<Option<Doctor>, DatabaseError> {
    Ok(get_doctors(conn)?.into_iter().find(|d| d.id == id))
}

/// Admin creation. Synthesizes id, role, and the counters a new doctor
/// starts with.
pub fn add_doctor(conn: &Connection, new_doctor: NewDoctor) -> Result<Doctor, DatabaseError> {
    let doctor = Doctor {
        id: Uuid::new_v4().to_string(),
        role: UserRole::Doctor,
        rating: 0.0,
        patients_count: 0,
        avatar_url: Some(format!(
            "https://ui-avatars.com/api/?name={}",
            new_doctor.name
        )),
        name: new_doctor.name,
        email: new_doctor.email,
        specialization: new_doctor.specialization,
        experience_years: new_doctor.experience_years,
        fee: new_doctor.fee,
        available_slots: new_doctor.available_slots,
        bio: new_doctor.bio,
    };

    let mut doctors = get_doctors(conn)?;
    doctors.push(doctor.clone());
    save_collection(conn, DOCTORS_KEY, &doctors)?;

    tracing::info!(doctor_id = %doctor.id, "Doctor added");
    Ok(doctor)
}

/// Admin removal — the only hard delete in the system. Returns whether a
/// record was actually removed.
pub fn delete_doctor(conn: &Connection, id: &str) -> Result<bool, DatabaseError> {
    let mut doctors = get_doctors(conn)?;
    let before = doctors.len();
    doctors.retain(|d| d.id != id);
    let removed = doctors.len() < before;
    if removed {
        save_collection(conn, DOCTORS_KEY, &doctors)?;
        tracing::info!(doctor_id = %id, "Doctor removed");
    }
    Ok(removed)
}

// ─── Patients ─────────────────────────────────────────────────────────────────

pub fn get_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    load_collection(conn, PATIENTS_KEY, seed::patients)
}

pub fn get_patient_by_id(conn: &Connection, id: &str) -> Result<Option<Patient>, DatabaseError> {
    Ok(get_patients(conn)?.into_iter().find(|p| p.id == id))
}

/// Replace the patient record with a matching id.
pub fn update_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    let mut patients = get_patients(conn)?;
    let Some(slot) = patients.iter_mut().find(|p| p.id == patient.id) else {
        return Err(DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: patient.id.clone(),
        });
    };
    *slot = patient.clone();
    save_collection(conn, PATIENTS_KEY, &patients)
}

/// Self-registration: minimal fields, clinical fields empty until the
/// patient fills in their profile.
pub fn register_patient(
    conn: &Connection,
    name: &str,
    email: &str,
) -> Result<Patient, DatabaseError> {
    let patient = Patient {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role: UserRole::Patient,
        dob: String::new(),
        blood_group: String::new(),
        address: String::new(),
        medical_history: Vec::new(),
        avatar_url: Some(format!("https://ui-avatars.com/api/?name={name}")),
    };

    let mut patients = get_patients(conn)?;
    patients.push(patient.clone());
    save_collection(conn, PATIENTS_KEY, &patients)?;

    tracing::info!(patient_id = %patient.id, "Patient registered");
    Ok(patient)
}

/// Append a free-text entry to the patient's medical history.
pub fn add_history_entry(
    conn: &Connection,
    patient_id: &str,
    entry: &str,
) -> Result<Patient, DatabaseError> {
    let mut patient =
        get_patient_by_id(conn, patient_id)?.ok_or_else(|| DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: patient_id.into(),
        })?;
    patient.medical_history.push(entry.to_string());
    update_patient(conn, &patient)?;
    Ok(patient)
}

/// Remove the history entry at `index` (insertion order).
pub fn remove_history_entry(
    conn: &Connection,
    patient_id: &str,
    index: usize,
) -> Result<Patient, DatabaseError> {
    let mut patient =
        get_patient_by_id(conn, patient_id)?.ok_or_else(|| DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: patient_id.into(),
        })?;
    if index >= patient.medical_history.len() {
        return Err(DatabaseError::NotFound {
            entity_type: "MedicalHistoryEntry".into(),
            id: index.to_string(),
        });
    }
    patient.medical_history.remove(index);
    update_patient(conn, &patient)?;
    Ok(patient)
}

// ─── Appointments ─────────────────────────────────────────────────────────────

pub fn get_appointments(conn: &Connection) -> Result<Vec<Appointment>, DatabaseError> {
    load_collection(conn, APPOINTMENTS_KEY, seed::appointments)
}

/// Append a new appointment. Always succeeds; uniqueness of the id is the
/// caller's concern (ids are uuids in practice).
pub fn add_appointment(
    conn: &Connection,
    appointment: &Appointment,
) -> Result<(), DatabaseError> {
    let mut appointments = get_appointments(conn)?;
    appointments.push(appointment.clone());
    save_collection(conn, APPOINTMENTS_KEY, &appointments)?;
    tracing::info!(
        appointment_id = %appointment.id,
        doctor = %appointment.doctor_name,
        date = %appointment.date,
        "Appointment added"
    );
    Ok(())
}

/// Overwrite the status of one appointment in place. The data layer does
/// not validate the transition; any status may replace any other.
pub fn update_appointment_status(
    conn: &Connection,
    id: &str,
    status: AppointmentStatus,
) -> Result<(), DatabaseError> {
    let mut appointments = get_appointments(conn)?;
    let Some(appointment) = appointments.iter_mut().find(|a| a.id == id) else {
        return Err(DatabaseError::NotFound {
            entity_type: "Appointment".into(),
            id: id.into(),
        });
    };
    appointment.status = status;
    save_collection(conn, APPOINTMENTS_KEY, &appointments)?;
    tracing::info!(appointment_id = %id, status = status.as_str(), "Appointment status updated");
    Ok(())
}

// ─── Email lookup ─────────────────────────────────────────────────────────────

/// Find a user by login email: the static admin first, then doctors, then
/// patients. First match wins; the store does not detect duplicate emails
/// across collections.
pub fn find_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>, DatabaseError> {
    let admin = seed::admin();
    if admin.email == email {
        return Ok(Some(admin));
    }
    if let Some(doctor) = get_doctors(conn)?.iter().find(|d| d.email == email) {
        return Ok(Some(doctor.user()));
    }
    Ok(get_patients(conn)?
        .iter()
        .find(|p| p.email == email)
        .map(|p| p.user()))
}

// ─── Session record ───────────────────────────────────────────────────────────

pub fn save_session(conn: &Connection, user: &User) -> Result<(), DatabaseError> {
    write_key(conn, SESSION_KEY, &serde_json::to_string(user)?)
}

pub fn load_session(conn: &Connection) -> Result<Option<User>, DatabaseError> {
    match read_key(conn, SESSION_KEY)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

pub fn clear_session(conn: &Connection) -> Result<(), DatabaseError> {
    delete_key(conn, SESSION_KEY)?;
    Ok(())
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::{NewDoctor, PaymentStatus, VisitType};
    use chrono::NaiveDate;

    fn sample_appointment(id: &str) -> Appointment {
        Appointment {
            id: id.into(),
            patient_id: "p1".into(),
            doctor_id: "d1".into(),
            patient_name: "John Doe".into(),
            doctor_name: "Dr. Sarah Wilson".into(),
            date: NaiveDate::from_ymd_opt(2026, 9, 14).unwrap(),
            time_slot: "10:00".into(),
            status: AppointmentStatus::Pending,
            visit_type: VisitType::InPerson,
            notes: None,
            payment_status: PaymentStatus::Paid,
            amount: 150.0,
        }
    }

    // ── Seed fallback ──

    #[test]
    fn empty_store_serves_seed_data() {
        let conn = open_memory_database().unwrap();
        assert_eq!(get_doctors(&conn).unwrap().len(), 3);
        assert_eq!(get_patients(&conn).unwrap().len(), 1);
        assert_eq!(get_appointments(&conn).unwrap().len(), 2);
    }

    #[test]
    fn seed_is_not_persisted_by_reads() {
        let conn = open_memory_database().unwrap();
        let _ = get_doctors(&conn).unwrap();
        // Reading must not write the key; only mutations persist.
        let stored = read_key(&conn, DOCTORS_KEY).unwrap();
        assert!(stored.is_none());
    }

    #[test]
    fn lookup_by_id_hits_and_misses() {
        let conn = open_memory_database().unwrap();
        assert!(get_doctor_by_id(&conn, "d1").unwrap().is_some());
        assert!(get_doctor_by_id(&conn, "nope").unwrap().is_none());
        assert!(get_patient_by_id(&conn, "p1").unwrap().is_some());
        assert!(get_patient_by_id(&conn, "nope").unwrap().is_none());
    }

    // ── Appointments ──

    #[test]
    fn add_appointment_appends_and_persists() {
        let conn = open_memory_database().unwrap();
        let before = get_appointments(&conn).unwrap().len();

        add_appointment(&conn, &sample_appointment("appt_x")).unwrap();

        let appointments = get_appointments(&conn).unwrap();
        assert_eq!(appointments.len(), before + 1);
        // Append order preserved
        assert_eq!(appointments.last().unwrap().id, "appt_x");
        // The whole collection (seed included) is now persisted
        assert!(read_key(&conn, APPOINTMENTS_KEY).unwrap().is_some());
    }

    #[test]
    fn update_status_touches_only_that_appointment() {
        let conn = open_memory_database().unwrap();
        add_appointment(&conn, &sample_appointment("appt_x")).unwrap();
        let before = get_appointments(&conn).unwrap();

        update_appointment_status(&conn, "appt_x", AppointmentStatus::Confirmed).unwrap();

        let after = get_appointments(&conn).unwrap();
        assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(after.iter()) {
            if a.id == "appt_x" {
                assert_eq!(a.status, AppointmentStatus::Confirmed);
                // Every other field untouched
                let mut reverted = a.clone();
                reverted.status = b.status;
                assert_eq!(&reverted, b);
            } else {
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn update_status_missing_id_is_not_found() {
        let conn = open_memory_database().unwrap();
        let err = update_appointment_status(&conn, "ghost", AppointmentStatus::Confirmed)
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    // ── Patients ──

    #[test]
    fn register_patient_creates_minimal_record() {
        let conn = open_memory_database().unwrap();
        let before = get_patients(&conn).unwrap().len();

        let alice = register_patient(&conn, "Alice", "alice@x.com").unwrap();

        assert_eq!(alice.name, "Alice");
        assert_eq!(alice.email, "alice@x.com");
        assert_eq!(alice.role, UserRole::Patient);
        assert!(alice.medical_history.is_empty());
        assert!(alice.dob.is_empty());
        assert_eq!(get_patients(&conn).unwrap().len(), before + 1);

        // Registered patient is immediately findable by email
        let found = find_user_by_email(&conn, "alice@x.com").unwrap().unwrap();
        assert_eq!(found.id, alice.id);
        assert_eq!(found.role, UserRole::Patient);
    }

    #[test]
    fn update_patient_missing_id_is_not_found() {
        let conn = open_memory_database().unwrap();
        let mut ghost = get_patients(&conn).unwrap().remove(0);
        ghost.id = "ghost".into();
        let err = update_patient(&conn, &ghost).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
        // Nothing was written
        assert!(read_key(&conn, PATIENTS_KEY).unwrap().is_none());
    }

    #[test]
    fn history_add_then_remove_round_trips() {
        let conn = open_memory_database().unwrap();
        let original = get_patient_by_id(&conn, "p1").unwrap().unwrap();

        let updated = add_history_entry(&conn, "p1", "Fractured wrist (2019)").unwrap();
        assert_eq!(
            updated.medical_history.len(),
            original.medical_history.len() + 1
        );

        let restored =
            remove_history_entry(&conn, "p1", updated.medical_history.len() - 1).unwrap();
        assert_eq!(restored.medical_history, original.medical_history);
    }

    #[test]
    fn history_allows_duplicate_entries() {
        let conn = open_memory_database().unwrap();
        add_history_entry(&conn, "p1", "Migraine").unwrap();
        let patient = add_history_entry(&conn, "p1", "Migraine").unwrap();
        let count = patient
            .medical_history
            .iter()
            .filter(|e| *e == "Migraine")
            .count();
        assert_eq!(count, 2);
    }

    #[test]
    fn history_remove_out_of_range_is_not_found() {
        let conn = open_memory_database().unwrap();
        let err = remove_history_entry(&conn, "p1", 99).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    // ── Doctors ──

    #[test]
    fn add_doctor_synthesizes_defaults() {
        let conn = open_memory_database().unwrap();
        let doctor = add_doctor(
            &conn,
            NewDoctor {
                name: "Dr. Ada Osei".into(),
                email: "ada@careconnect.com".into(),
                specialization: "Dermatology".into(),
                experience_years: 7,
                fee: 120.0,
                available_slots: vec!["09:00".into()],
                bio: "Skin health specialist.".into(),
            },
        )
        .unwrap();

        assert_eq!(doctor.role, UserRole::Doctor);
        assert_eq!(doctor.rating, 0.0);
        assert_eq!(doctor.patients_count, 0);
        assert_eq!(get_doctors(&conn).unwrap().len(), 4);
    }

    #[test]
    fn delete_doctor_filters_by_id() {
        let conn = open_memory_database().unwrap();
        assert!(delete_doctor(&conn, "d2").unwrap());
        let doctors = get_doctors(&conn).unwrap();
        assert_eq!(doctors.len(), 2);
        assert!(doctors.iter().all(|d| d.id != "d2"));
        // Second delete finds nothing
        assert!(!delete_doctor(&conn, "d2").unwrap());
    }

    // ── Email lookup ──

    #[test]
    fn find_user_checks_admin_then_doctors_then_patients() {
        let conn = open_memory_database().unwrap();

        let admin = find_user_by_email(&conn, "admin@careconnect.com")
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, UserRole::Admin);

        let doctor = find_user_by_email(&conn, "sarah@careconnect.com")
            .unwrap()
            .unwrap();
        assert_eq!(doctor.role, UserRole::Doctor);
        assert_eq!(doctor.id, "d1");

        let patient = find_user_by_email(&conn, "john@gmail.com").unwrap().unwrap();
        assert_eq!(patient.role, UserRole::Patient);

        assert!(find_user_by_email(&conn, "nobody@x.com").unwrap().is_none());
    }

    #[test]
    fn find_user_is_idempotent() {
        let conn = open_memory_database().unwrap();
        let first = find_user_by_email(&conn, "sarah@careconnect.com").unwrap();
        let second = find_user_by_email(&conn, "sarah@careconnect.com").unwrap();
        assert_eq!(first, second);
    }

    // ── Session record ──

    #[test]
    fn session_round_trips() {
        let conn = open_memory_database().unwrap();
        assert!(load_session(&conn).unwrap().is_none());

        let user = seed::admin();
        save_session(&conn, &user).unwrap();
        assert_eq!(load_session(&conn).unwrap(), Some(user));

        clear_session(&conn).unwrap();
        assert!(load_session(&conn).unwrap().is_none());
    }

    // ── Corruption ──

    #[test]
    fn malformed_stored_collection_is_a_serialization_error() {
        let conn = open_memory_database().unwrap();
        write_key(&conn, DOCTORS_KEY, "not json").unwrap();
        let err = get_doctors(&conn).unwrap_err();
        assert!(matches!(err, DatabaseError::Serialization(_)));
    }
}
