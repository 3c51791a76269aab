pub mod appointment;
pub mod doctor;
pub mod enums;
pub mod patient;
pub mod user;

pub use appointment::Appointment;
pub use doctor::{Doctor, NewDoctor};
pub use enums::{AppointmentStatus, PaymentStatus, UserRole, VisitType};
pub use patient::Patient;
pub use user::User;
