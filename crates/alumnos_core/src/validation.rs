//! crates/alumnos_core/src/validation.rs
//!
//! Client-side rules checked before any request is issued.

use crate::domain::UploadFile;

/// Largest file a student may upload, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// MIME types accepted for task submissions: pdf, doc, docx, jpeg and png.
pub const ALLOWED_UPLOAD_TYPES: [&str; 5] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "image/jpeg",
    "image/png",
];

pub const MIN_GRADE: u8 = 1;
pub const MAX_GRADE: u8 = 10;

/// A rule failure. Shown inline; no network call is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("all fields are required")]
    IncompleteForm,
    #[error("the file cannot be larger than 5MB")]
    FileTooLarge,
    #[error("only PDF, DOC, DOCX, JPG or PNG files are allowed")]
    UnsupportedFileType,
    #[error("no file selected")]
    NoFile,
    #[error("this task already has a submission")]
    AlreadySubmitted,
    #[error("incorrect captcha, try again")]
    CaptchaMismatch,
    #[error("enter a valid grade (1-10)")]
    GradeOutOfRange,
    #[error("enter a valid email")]
    InvalidEmail,
    #[error("you cannot add yourself as a student")]
    SelfEnrollment,
    #[error("this student was already added")]
    DuplicateStudent,
    #[error("add at least one student")]
    NoStudents,
    #[error("add at least one question")]
    NoQuestions,
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("question {0} does not exist")]
    NoSuchQuestion(usize),
    #[error("the message and the recipient cannot be empty")]
    EmptyMessage,
    #[error("a session is already active")]
    SessionActive,
    #[error("you are not allowed to view this task")]
    NotYourTask,
}

pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Checks a picked file against the size limit first, then the type allow-list.
pub fn validate_upload(file: &UploadFile) -> Result<(), ValidationError> {
    if file.size() > MAX_UPLOAD_BYTES {
        return Err(ValidationError::FileTooLarge);
    }
    if !ALLOWED_UPLOAD_TYPES.contains(&file.mime_type.as_str()) {
        return Err(ValidationError::UnsupportedFileType);
    }
    Ok(())
}

/// Guesses the MIME type of an upload from its extension.
pub fn mime_for_file_name(file_name: &str) -> Option<&'static str> {
    let extension = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match extension.as_str() {
        "pdf" => Some("application/pdf"),
        "doc" => Some("application/msword"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}

/// Accepts the answer iff it is an integer equal to `num1 + num2`.
pub fn check_captcha(num1: u32, num2: u32, answer: &str) -> Result<(), ValidationError> {
    match answer.trim().parse::<i64>() {
        Ok(value) if value == i64::from(num1) + i64::from(num2) => Ok(()),
        _ => Err(ValidationError::CaptchaMismatch),
    }
}

pub fn parse_grade(input: &str) -> Result<u8, ValidationError> {
    input
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|g| (MIN_GRADE..=MAX_GRADE).contains(g))
        .ok_or(ValidationError::GradeOutOfRange)
}
