//! Mock domain data for the demo: doctors, records, reminders, metrics.
//! Everything here lives in memory for the session; only the user profile
//! (see `profile.rs`) is ever persisted.

#[derive(Debug, Clone)]
pub struct Doctor {
    pub name: String,
    pub specialty: String,
    pub rating: f32,
    pub distance_km: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentStatus {
    Upcoming,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AppointmentStatus::Upcoming => "CONFIRMED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Appointment {
    pub id: u64,
    pub doctor_name: String,
    pub specialty: String,
    pub date: String,
    pub time: String,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    LabReport,
    Prescription,
    XRay,
    Other,
}

impl RecordKind {
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::LabReport => "Lab Report",
            RecordKind::Prescription => "Prescription",
            RecordKind::XRay => "X-Ray",
            RecordKind::Other => "Other",
        }
    }

    pub fn all() -> [RecordKind; 4] {
        [
            RecordKind::LabReport,
            RecordKind::Prescription,
            RecordKind::XRay,
            RecordKind::Other,
        ]
    }
}

#[derive(Debug, Clone)]
pub struct MedicalRecord {
    pub title: String,
    pub kind: RecordKind,
    pub date: String,
    pub doctor: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderKind {
    Medication,
    General,
}

#[derive(Debug, Clone)]
pub struct Reminder {
    pub title: String,
    pub time: String,
    pub kind: ReminderKind,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricStatus {
    Good,
    Warning,
}

#[derive(Debug, Clone)]
pub struct HealthMetric {
    pub label: &'static str,
    pub value: &'static str,
    pub unit: &'static str,
    pub status: MetricStatus,
}

#[derive(Debug, Clone)]
pub struct EmergencyAction {
    pub title: &'static str,
    pub subtitle: &'static str,
}

pub fn doctors() -> Vec<Doctor> {
    vec![
        Doctor {
            name: "Dr. Sarah Wilson".to_string(),
            specialty: "Cardiologist".to_string(),
            rating: 4.8,
            distance_km: 1.2,
        },
        Doctor {
            name: "Dr. James Chen".to_string(),
            specialty: "Dentist".to_string(),
            rating: 4.9,
            distance_km: 2.5,
        },
        Doctor {
            name: "Dr. Emily Brooks".to_string(),
            specialty: "General Practitioner".to_string(),
            rating: 4.7,
            distance_km: 0.8,
        },
        Doctor {
            name: "Dr. Michael Ross".to_string(),
            specialty: "Dermatologist".to_string(),
            rating: 4.9,
            distance_km: 3.0,
        },
    ]
}

pub fn initial_appointments() -> Vec<Appointment> {
    vec![Appointment {
        id: 1,
        doctor_name: "Dr. Sarah Wilson".to_string(),
        specialty: "Cardiologist".to_string(),
        date: "Feb 24, 2024".to_string(),
        time: "10:00 AM".to_string(),
        status: AppointmentStatus::Upcoming,
    }]
}

pub fn records() -> Vec<MedicalRecord> {
    vec![
        MedicalRecord {
            title: "Blood Test Results".to_string(),
            kind: RecordKind::LabReport,
            date: "2023-11-15".to_string(),
            doctor: "Dr. Sarah Wilson".to_string(),
        },
        MedicalRecord {
            title: "Amoxicillin Rx".to_string(),
            kind: RecordKind::Prescription,
            date: "2023-10-02".to_string(),
            doctor: "Dr. James Chen".to_string(),
        },
        MedicalRecord {
            title: "Chest X-Ray".to_string(),
            kind: RecordKind::XRay,
            date: "2023-08-20".to_string(),
            doctor: "Dr. Emily Brooks".to_string(),
        },
        MedicalRecord {
            title: "Annual Physical".to_string(),
            kind: RecordKind::Other,
            date: "2023-06-10".to_string(),
            doctor: "Dr. Michael Ross".to_string(),
        },
    ]
}

pub fn reminders() -> Vec<Reminder> {
    vec![
        Reminder {
            title: "Take Vitamin D (1000IU)".to_string(),
            time: "08:00 AM".to_string(),
            kind: ReminderKind::Medication,
            completed: true,
        },
        Reminder {
            title: "Drink 2 Glasses of Water".to_string(),
            time: "02:00 PM".to_string(),
            kind: ReminderKind::General,
            completed: false,
        },
        Reminder {
            title: "Metformin (500mg)".to_string(),
            time: "08:00 PM".to_string(),
            kind: ReminderKind::Medication,
            completed: false,
        },
        Reminder {
            title: "Evening Stretching".to_string(),
            time: "09:00 PM".to_string(),
            kind: ReminderKind::General,
            completed: false,
        },
    ]
}

pub fn metrics() -> Vec<HealthMetric> {
    vec![
        HealthMetric {
            label: "Heart Rate",
            value: "72",
            unit: "bpm",
            status: MetricStatus::Good,
        },
        HealthMetric {
            label: "Steps",
            value: "3,490",
            unit: "/ 10k",
            status: MetricStatus::Warning,
        },
        HealthMetric {
            label: "Weight",
            value: "68",
            unit: "kg",
            status: MetricStatus::Good,
        },
        HealthMetric {
            label: "Hydration",
            value: "4",
            unit: "glasses",
            status: MetricStatus::Warning,
        },
    ]
}

/// Steps per day for the activity trend sparkline (Mon..Sun).
pub fn weekly_steps() -> [(&'static str, u64); 7] {
    [
        ("Mon", 4000),
        ("Tue", 3000),
        ("Wed", 2000),
        ("Thu", 2780),
        ("Fri", 1890),
        ("Sat", 2390),
        ("Sun", 3490),
    ]
}

pub fn emergency_actions() -> Vec<EmergencyAction> {
    vec![
        EmergencyAction {
            title: "Call 112",
            subtitle: "National Emergency",
        },
        EmergencyAction {
            title: "Call Ambulance",
            subtitle: "Private service",
        },
        EmergencyAction {
            title: "Emergency Contact",
            subtitle: "Mom (Default)",
        },
    ]
}

pub const BLOOD_TYPES: [&str; 8] = ["A+", "A-", "B+", "B-", "O+", "O-", "AB+", "AB-"];
