//! Scripted emergency-department shift over an in-memory record store.

use chrono::{Days, NaiveDate, Utc};
use pronto_core::clinical::{
    ExamCategory, ExamRequestInput, ExamResultInput, NoteCategory, NoteInput, PrescriptionInput,
    PrescriptionItemInput, Route, VitalSigns, VitalSignsInput,
};
use pronto_core::{
    AttendanceId, AttendanceStatus, CoreConfig, PatientInput, PractitionerInput, RecordServices,
    Role, TimelineEntry,
};
use std::error::Error;
use std::io::Write;
use std::sync::Arc;

fn practitioner(account: &str, full_name: &str, role: Role) -> PractitionerInput {
    PractitionerInput {
        account: account.into(),
        full_name: full_name.into(),
        role,
        registration: None,
    }
}

fn patient(name: &str, national_id: &str, birth_date: NaiveDate) -> PatientInput {
    PatientInput {
        name: name.into(),
        national_id: national_id.into(),
        birth_date: Some(birth_date),
        ..Default::default()
    }
}

fn note(category: NoteCategory, text: &str) -> NoteInput {
    NoteInput {
        category,
        text: text.into(),
    }
}

fn describe(entry: &TimelineEntry<'_>) -> String {
    match entry {
        TimelineEntry::Note(note) => format!("{}: {}", note.category.label(), note.text),
        TimelineEntry::Vitals(vitals) => {
            let m = &vitals.measurements;
            let mut parts = Vec::new();
            if let Some(bp) = m.blood_pressure() {
                parts.push(format!("BP {bp}"));
            }
            if let Some(hr) = m.heart_rate {
                parts.push(format!("HR {hr}"));
            }
            if let Some(t) = m.temperature {
                parts.push(format!("T {t:.1}"));
            }
            if let Some(sat) = m.saturation {
                parts.push(format!("SpO2 {sat}%"));
            }
            format!("vital signs: {}", parts.join(", "))
        }
        TimelineEntry::Prescription(prescription) => {
            let items: Vec<String> = prescription.items.iter().map(|i| i.summary()).collect();
            format!("prescription: {}", items.join("; "))
        }
        TimelineEntry::Exam(exam) => match &exam.result {
            Some(result) => format!("exam {}: {}", exam.exam_name, result.text),
            None => format!("exam {} ({})", exam.exam_name, exam.status.label()),
        },
    }
}

fn print_timeline(
    services: &RecordServices,
    attendance: AttendanceId,
    out: &mut dyn Write,
) -> Result<(), Box<dyn Error>> {
    let summary = services.attendances.summary(attendance)?;
    writeln!(
        out,
        "\nTimeline for attendance {} ({}, {}):",
        attendance, summary.patient_name, summary.attendance.status
    )?;

    let timeline = services.clinical.timeline(attendance)?;
    for event in timeline.events() {
        write!(
            out,
            "  {}  {}",
            event.at.format("%H:%M:%S%.3f"),
            describe(&event.entry)
        )?;
        if let TimelineEntry::Vitals(vitals) = event.entry {
            let alerts = services.clinical.alerts_for(&vitals.measurements);
            if !alerts.is_empty() {
                let labels: Vec<&str> = alerts.iter().map(|a| a.label()).collect();
                write!(out, "  [alerts: {}]", labels.join(", "))?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Runs the scripted shift and writes the dashboard and every timeline to `out`.
///
/// # Errors
/// Returns the first record operation that fails, or an I/O error from `out`.
pub fn run_demo(cfg: Arc<CoreConfig>, out: &mut dyn Write) -> Result<(), Box<dyn Error>> {
    let services = RecordServices::new(cfg);
    let today = Utc::now().date_naive();

    let physician = services.practitioners.register(practitioner(
        "rui",
        "Dr. Rui Costa",
        Role::Physician,
    ))?;
    let nurse =
        services
            .practitioners
            .register(practitioner("joana", "Joana Prado", Role::Nurse))?;
    let clerk = services.practitioners.register(practitioner(
        "carla",
        "Carla Nunes",
        Role::Administrative,
    ))?;

    let maria = services.attendances.register_with_patient(
        patient(
            "Maria Santos",
            "123.456.789-01",
            NaiveDate::from_ymd_opt(1958, 3, 14).ok_or("invalid date")?,
        ),
        "chest pain for two hours",
        Some(&clerk),
    )?;
    let joao = services.attendances.register_with_patient(
        patient(
            "João Pereira",
            "987.654.321-00",
            NaiveDate::from_ymd_opt(1994, 11, 2).ok_or("invalid date")?,
        ),
        "fever and cough",
        None,
    )?;
    let maria_id = maria.attendance.id;
    let joao_id = joao.attendance.id;

    let recorded = services.clinical.record_vitals(
        maria_id,
        VitalSignsInput {
            measurements: VitalSigns {
                systolic: Some(150),
                diastolic: Some(95),
                heart_rate: Some(105),
                temperature: Some(38.2),
                saturation: Some(92),
                ..Default::default()
            },
            notes: None,
        },
        Some(&nurse),
    )?;
    writeln!(
        out,
        "Recorded vitals for {} with {} alert(s)",
        maria.patient.name(),
        recorded.alerts.len()
    )?;

    services
        .attendances
        .update_status(maria_id, AttendanceStatus::InProgress, Some(&physician))?;
    services.clinical.add_note(
        maria_id,
        note(
            NoteCategory::Anamnesis,
            "Oppressive chest pain radiating to the left arm.",
        ),
        Some(&physician),
    )?;
    services.clinical.create_prescription(
        maria_id,
        PrescriptionInput {
            valid_until: today.checked_add_days(Days::new(1)).ok_or("invalid date")?,
            notes: None,
            items: vec![PrescriptionItemInput {
                medication: "Acetylsalicylic acid".into(),
                dose: "300 mg".into(),
                route: Route::Oral,
                frequency: "single dose".into(),
                duration_days: 1,
                notes: Some("chewed".into()),
            }],
        },
        Some(&physician),
    )?;
    let troponin = services.clinical.request_exam(
        maria_id,
        ExamRequestInput {
            category: ExamCategory::Laboratory,
            exam_name: "Troponin".into(),
            justification: "suspected acute coronary syndrome".into(),
        },
        Some(&physician),
    )?;
    services
        .attendances
        .update_status(maria_id, AttendanceStatus::AwaitingResult, Some(&nurse))?;
    services
        .clinical
        .mark_exam_collected(troponin.id, Some(&nurse))?;
    services.clinical.attach_exam_result(
        troponin.id,
        ExamResultInput {
            text: "Troponin below the reference limit".into(),
            attachment: None,
            notes: None,
        },
        Some(&nurse),
    )?;

    services.clinical.record_vitals(
        joao_id,
        VitalSignsInput {
            measurements: VitalSigns {
                systolic: Some(125),
                diastolic: Some(80),
                heart_rate: Some(78),
                temperature: Some(36.5),
                saturation: Some(98),
                ..Default::default()
            },
            notes: None,
        },
        Some(&nurse),
    )?;
    services.clinical.add_note(
        joao_id,
        note(NoteCategory::NursingNote, "Patient calm, afebrile at triage."),
        Some(&nurse),
    )?;
    services.clinical.request_exam(
        joao_id,
        ExamRequestInput {
            category: ExamCategory::Imaging,
            exam_name: "Chest X-ray".into(),
            justification: "persistent cough".into(),
        },
        Some(&physician),
    )?;

    writeln!(out, "\nDashboard:")?;
    for row in services.attendances.dashboard()? {
        writeln!(
            out,
            "  #{} {} - {} - {}",
            row.attendance.id, row.patient_name, row.attendance.status, row.practitioner
        )?;
    }

    print_timeline(&services, maria_id, out)?;
    print_timeline(&services, joao_id, out)?;
    Ok(())
}
