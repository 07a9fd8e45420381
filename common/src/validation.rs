// Form input validation mirroring the workforce API's rules.
// The API re-checks everything server-side; these checks exist so forms can
// render field-level errors without a network round trip.

use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::errors::FieldError;
use crate::models::{
    parse_date_time, ForemanCreate, ForemanUpdate, Gender, TaskCreate, TaskUpdate,
    TechnicianCreate, TechnicianUpdate,
};

pub const FULL_NAME_MESSAGE: &str =
    "ФИО должно содержать фамилию, имя и отчество разделенные пробелом";
pub const PHONE_MESSAGE: &str = "Введите корректный номер телефона";
pub const GENDER_MESSAGE: &str = "Выберите корректный пол";
pub const WORKSHOP_MESSAGE: &str = "Название цеха должно содержать не более 50 символов";
pub const SPECIALIZATION_MESSAGE: &str =
    "Специализация должна содержать не более 50 символов";
pub const DESCRIPTION_MIN_MESSAGE: &str =
    "Описание задачи должно содержать не менее 5 символов";
pub const DESCRIPTION_MAX_MESSAGE: &str =
    "Описание задачи должно содержать не более 500 символов";
pub const DATE_TIME_MESSAGE: &str = "Неверный формат даты и времени (ДД.ММ.ГГГГ ЧЧ:ММ)";
pub const TIME_ORDER_MESSAGE: &str = "Время окончания должно быть позже времени начала";
pub const NATURAL_ID_MESSAGE: &str = "Идентификатор должен быть натуральным числом";

lazy_static! {
    static ref FULL_NAME_RE: Regex =
        Regex::new(r"^\S+ \S+ \S+$").expect("Invalid regex pattern");
    static ref PHONE_RE: Regex =
        Regex::new(r"^\+?[0-9]{11}$").expect("Invalid regex pattern");
}

const LABEL_MAX_CHARS: usize = 50;
const DESCRIPTION_MIN_CHARS: usize = 5;
const DESCRIPTION_MAX_CHARS: usize = 500;

fn check_full_name(value: &str) -> Option<FieldError> {
    if FULL_NAME_RE.is_match(value) {
        None
    } else {
        Some(FieldError::new("full_name", FULL_NAME_MESSAGE))
    }
}

fn check_phone(value: &str) -> Option<FieldError> {
    if PHONE_RE.is_match(value) {
        None
    } else {
        Some(FieldError::new("phone_number", PHONE_MESSAGE))
    }
}

fn check_gender(value: &str) -> Result<Gender, FieldError> {
    value
        .parse::<Gender>()
        .map_err(|_| FieldError::new("gender", GENDER_MESSAGE))
}

fn check_label(value: &str, field: &str, message: &str) -> Option<FieldError> {
    if value.chars().count() > LABEL_MAX_CHARS {
        Some(FieldError::new(field, message))
    } else {
        None
    }
}

fn check_description(value: &str) -> Option<FieldError> {
    let len = value.chars().count();
    if len < DESCRIPTION_MIN_CHARS {
        Some(FieldError::new("task_description", DESCRIPTION_MIN_MESSAGE))
    } else if len > DESCRIPTION_MAX_CHARS {
        Some(FieldError::new("task_description", DESCRIPTION_MAX_MESSAGE))
    } else {
        None
    }
}

fn check_date_time(value: &str, field: &str) -> Result<NaiveDateTime, FieldError> {
    parse_date_time(value).ok_or_else(|| FieldError::new(field, DATE_TIME_MESSAGE))
}

/// Parse an identifier typed or selected by the user. Natural means a
/// positive integer; zero, negatives, fractions, and junk are rejected.
pub fn parse_natural_id(value: &str, field: &str) -> Result<i64, FieldError> {
    match value.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(FieldError::new(field, NATURAL_ID_MESSAGE)),
    }
}

// ============================================================================
// Form Inputs
// ============================================================================

/// Raw fields of the foreman create form
#[derive(Debug, Clone, Deserialize)]
pub struct ForemanCreateForm {
    pub full_name: String,
    pub gender: String,
    pub workshop: String,
    pub phone_number: String,
}

impl ForemanCreateForm {
    pub fn validate(&self) -> Result<ForemanCreate, Vec<FieldError>> {
        let mut errors = Vec::new();

        if let Some(e) = check_full_name(&self.full_name) {
            errors.push(e);
        }
        let gender = match check_gender(&self.gender) {
            Ok(g) => Some(g),
            Err(e) => {
                errors.push(e);
                None
            }
        };
        if let Some(e) = check_label(&self.workshop, "workshop", WORKSHOP_MESSAGE) {
            errors.push(e);
        }
        if let Some(e) = check_phone(&self.phone_number) {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(ForemanCreate {
                full_name: self.full_name.clone(),
                gender: gender.unwrap(),
                workshop: self.workshop.clone(),
                phone_number: self.phone_number.clone(),
            })
        } else {
            Err(errors)
        }
    }
}

/// Raw fields of the foreman edit form; gender is not editable
#[derive(Debug, Clone, Deserialize)]
pub struct ForemanUpdateForm {
    pub full_name: String,
    pub workshop: String,
    pub phone_number: String,
}

impl ForemanUpdateForm {
    pub fn validate(&self) -> Result<ForemanUpdate, Vec<FieldError>> {
        let mut errors = Vec::new();

        if let Some(e) = check_full_name(&self.full_name) {
            errors.push(e);
        }
        if let Some(e) = check_label(&self.workshop, "workshop", WORKSHOP_MESSAGE) {
            errors.push(e);
        }
        if let Some(e) = check_phone(&self.phone_number) {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(ForemanUpdate {
                full_name: self.full_name.clone(),
                workshop: self.workshop.clone(),
                phone_number: self.phone_number.clone(),
            })
        } else {
            Err(errors)
        }
    }
}

/// Raw fields of the technician create form
#[derive(Debug, Clone, Deserialize)]
pub struct TechnicianCreateForm {
    pub specialization: String,
    pub full_name: String,
    pub gender: String,
    pub phone_number: String,
}

impl TechnicianCreateForm {
    pub fn validate(&self) -> Result<TechnicianCreate, Vec<FieldError>> {
        let mut errors = Vec::new();

        if let Some(e) = check_full_name(&self.full_name) {
            errors.push(e);
        }
        let gender = match check_gender(&self.gender) {
            Ok(g) => Some(g),
            Err(e) => {
                errors.push(e);
                None
            }
        };
        if let Some(e) = check_label(&self.specialization, "specialization", SPECIALIZATION_MESSAGE)
        {
            errors.push(e);
        }
        if let Some(e) = check_phone(&self.phone_number) {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(TechnicianCreate {
                specialization: self.specialization.clone(),
                full_name: self.full_name.clone(),
                gender: gender.unwrap(),
                phone_number: self.phone_number.clone(),
            })
        } else {
            Err(errors)
        }
    }
}

/// Raw fields of the technician edit form; gender is not editable
#[derive(Debug, Clone, Deserialize)]
pub struct TechnicianUpdateForm {
    pub specialization: String,
    pub full_name: String,
    pub phone_number: String,
}

impl TechnicianUpdateForm {
    pub fn validate(&self) -> Result<TechnicianUpdate, Vec<FieldError>> {
        let mut errors = Vec::new();

        if let Some(e) = check_full_name(&self.full_name) {
            errors.push(e);
        }
        if let Some(e) = check_label(&self.specialization, "specialization", SPECIALIZATION_MESSAGE)
        {
            errors.push(e);
        }
        if let Some(e) = check_phone(&self.phone_number) {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(TechnicianUpdate {
                specialization: self.specialization.clone(),
                full_name: self.full_name.clone(),
                phone_number: self.phone_number.clone(),
            })
        } else {
            Err(errors)
        }
    }
}

/// Raw fields of the task create form. The workshop select carries the
/// chosen foreman's id, matching the API's create contract.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskCreateForm {
    pub start_time: String,
    pub end_time: String,
    pub workshop: String,
    pub foreman_id: String,
    pub technician_id: String,
    pub task_description: String,
}

impl TaskCreateForm {
    pub fn validate(&self) -> Result<TaskCreate, Vec<FieldError>> {
        let mut errors = Vec::new();

        let start = match check_date_time(&self.start_time, "start_time") {
            Ok(t) => Some(t),
            Err(e) => {
                errors.push(e);
                None
            }
        };
        let end = match check_date_time(&self.end_time, "end_time") {
            Ok(t) => Some(t),
            Err(e) => {
                errors.push(e);
                None
            }
        };
        if let (Some(start), Some(end)) = (start, end) {
            if end <= start {
                errors.push(FieldError::new("end_time", TIME_ORDER_MESSAGE));
            }
        }

        let workshop = match parse_natural_id(&self.workshop, "workshop") {
            Ok(id) => Some(id),
            Err(e) => {
                errors.push(e);
                None
            }
        };
        let foreman_id = match parse_natural_id(&self.foreman_id, "foreman_id") {
            Ok(id) => Some(id),
            Err(e) => {
                errors.push(e);
                None
            }
        };
        let technician_id = match parse_natural_id(&self.technician_id, "technician_id") {
            Ok(id) => Some(id),
            Err(e) => {
                errors.push(e);
                None
            }
        };

        if let Some(e) = check_description(&self.task_description) {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(TaskCreate {
                start_time: self.start_time.trim().to_string(),
                end_time: self.end_time.trim().to_string(),
                workshop: workshop.unwrap(),
                foreman_id: foreman_id.unwrap(),
                technician_id: technician_id.unwrap(),
                task_description: self.task_description.clone(),
            })
        } else {
            Err(errors)
        }
    }
}

/// Raw fields of the task edit form
#[derive(Debug, Clone, Deserialize)]
pub struct TaskUpdateForm {
    pub start_time: String,
    pub end_time: String,
    pub task_description: String,
}

impl TaskUpdateForm {
    pub fn validate(&self) -> Result<TaskUpdate, Vec<FieldError>> {
        let mut errors = Vec::new();

        let start = match check_date_time(&self.start_time, "start_time") {
            Ok(t) => Some(t),
            Err(e) => {
                errors.push(e);
                None
            }
        };
        let end = match check_date_time(&self.end_time, "end_time") {
            Ok(t) => Some(t),
            Err(e) => {
                errors.push(e);
                None
            }
        };
        if let (Some(start), Some(end)) = (start, end) {
            if end <= start {
                errors.push(FieldError::new("end_time", TIME_ORDER_MESSAGE));
            }
        }

        if let Some(e) = check_description(&self.task_description) {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(TaskUpdate {
                start_time: self.start_time.trim().to_string(),
                end_time: self.end_time.trim().to_string(),
                task_description: self.task_description.clone(),
            })
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foreman_form() -> ForemanCreateForm {
        ForemanCreateForm {
            full_name: "Иванов Иван Иванович".to_string(),
            gender: "М".to_string(),
            workshop: "Сталелитейный".to_string(),
            phone_number: "+79991234567".to_string(),
        }
    }

    fn task_form() -> TaskCreateForm {
        TaskCreateForm {
            start_time: "01.03.2025 08:00".to_string(),
            end_time: "01.03.2025 17:00".to_string(),
            workshop: "2".to_string(),
            foreman_id: "2".to_string(),
            technician_id: "9".to_string(),
            task_description: "Отливка партии корпусов".to_string(),
        }
    }

    #[test]
    fn test_valid_foreman_form_passes() {
        let dto = foreman_form().validate().unwrap();
        assert_eq!(dto.full_name, "Иванов Иван Иванович");
        assert_eq!(dto.gender, Gender::Male);
    }

    #[test]
    fn test_full_name_requires_three_tokens() {
        for bad in ["Иванов Иван", "Иванов", "Иванов Иван Иванович Старший", ""] {
            let mut form = foreman_form();
            form.full_name = bad.to_string();
            let errors = form.validate().unwrap_err();
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "full_name");
            assert_eq!(errors[0].message, FULL_NAME_MESSAGE);
        }
    }

    #[test]
    fn test_full_name_rejects_extra_whitespace() {
        let mut form = foreman_form();
        form.full_name = "Иванов  Иван Иванович".to_string();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_phone_rules() {
        for good in ["+79991234567", "89991234567"] {
            let mut form = foreman_form();
            form.phone_number = good.to_string();
            assert!(form.validate().is_ok(), "expected {} to pass", good);
        }
        for bad in ["799912345", "+7999123456789", "7999123456a", "++79991234567", ""] {
            let mut form = foreman_form();
            form.phone_number = bad.to_string();
            let errors = form.validate().unwrap_err();
            assert_eq!(errors[0].message, PHONE_MESSAGE);
        }
    }

    #[test]
    fn test_gender_must_be_known_label() {
        let mut form = foreman_form();
        form.gender = "X".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors[0].field, "gender");
        assert_eq!(errors[0].message, GENDER_MESSAGE);
    }

    #[test]
    fn test_workshop_label_limit() {
        let mut form = foreman_form();
        form.workshop = "ц".repeat(51);
        let errors = form.validate().unwrap_err();
        assert_eq!(errors[0].message, WORKSHOP_MESSAGE);

        form.workshop = "ц".repeat(50);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_all_errors_are_collected() {
        let form = ForemanCreateForm {
            full_name: "Иванов".to_string(),
            gender: "неизвестно".to_string(),
            workshop: "ц".repeat(60),
            phone_number: "123".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_update_form_skips_gender() {
        let form = ForemanUpdateForm {
            full_name: "Петров Петр Петрович".to_string(),
            workshop: "Литейный".to_string(),
            phone_number: "89991234567".to_string(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_specialization_label_limit() {
        let form = TechnicianCreateForm {
            specialization: "с".repeat(51),
            full_name: "Сидоров Семен Семенович".to_string(),
            gender: "М".to_string(),
            phone_number: "+79991234567".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors[0].message, SPECIALIZATION_MESSAGE);
    }

    #[test]
    fn test_valid_task_form_passes() {
        let dto = task_form().validate().unwrap();
        assert_eq!(dto.workshop, 2);
        assert_eq!(dto.technician_id, 9);
    }

    #[test]
    fn test_task_times_must_match_format() {
        let mut form = task_form();
        form.start_time = "2025-03-01 08:00".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors[0].field, "start_time");
        assert_eq!(errors[0].message, DATE_TIME_MESSAGE);
    }

    #[test]
    fn test_task_end_must_be_after_start() {
        let mut form = task_form();
        form.end_time = form.start_time.clone();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "end_time");
        assert_eq!(errors[0].message, TIME_ORDER_MESSAGE);

        form.end_time = "01.03.2025 07:59".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors[0].field, "end_time");
    }

    #[test]
    fn test_order_check_skipped_when_format_invalid() {
        let mut form = task_form();
        form.end_time = "не дата".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, DATE_TIME_MESSAGE);
    }

    #[test]
    fn test_description_bounds() {
        let mut form = task_form();
        form.task_description = "мало".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors[0].message, DESCRIPTION_MIN_MESSAGE);

        form.task_description = "о".repeat(501);
        let errors = form.validate().unwrap_err();
        assert_eq!(errors[0].message, DESCRIPTION_MAX_MESSAGE);

        form.task_description = "о".repeat(500);
        assert!(form.validate().is_ok());
        form.task_description = "опять".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_task_ids_must_be_natural() {
        for bad in ["0", "-3", "3.5", "abc", ""] {
            let mut form = task_form();
            form.technician_id = bad.to_string();
            let errors = form.validate().unwrap_err();
            assert_eq!(errors[0].field, "technician_id");
            assert_eq!(errors[0].message, NATURAL_ID_MESSAGE);
        }
    }

    #[test]
    fn test_task_update_form() {
        let form = TaskUpdateForm {
            start_time: "01.03.2025 08:00".to_string(),
            end_time: "01.03.2025 08:01".to_string(),
            task_description: "Проверить крепеж".to_string(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_parse_natural_id() {
        assert_eq!(parse_natural_id("42", "id").unwrap(), 42);
        assert_eq!(parse_natural_id(" 7 ", "id").unwrap(), 7);
        assert!(parse_natural_id("0", "id").is_err());
        assert!(parse_natural_id("-1", "id").is_err());
        assert!(parse_natural_id("12abc", "id").is_err());
    }
}
