// Property-based tests for form validation

use chrono::Duration;
use common::models::{format_date_time, parse_date_time};
use common::validation::{
    parse_natural_id, ForemanCreateForm, TaskCreateForm, DESCRIPTION_MAX_MESSAGE,
    DESCRIPTION_MIN_MESSAGE, FULL_NAME_MESSAGE, NATURAL_ID_MESSAGE, PHONE_MESSAGE,
    TIME_ORDER_MESSAGE,
};
use proptest::prelude::*;

fn valid_foreman_form() -> ForemanCreateForm {
    ForemanCreateForm {
        full_name: "Иванов Иван Иванович".to_string(),
        gender: "М".to_string(),
        workshop: "Сборочный".to_string(),
        phone_number: "+79991234567".to_string(),
    }
}

fn valid_task_form() -> TaskCreateForm {
    TaskCreateForm {
        start_time: "01.03.2025 08:00".to_string(),
        end_time: "01.03.2025 17:00".to_string(),
        workshop: "1".to_string(),
        foreman_id: "1".to_string(),
        technician_id: "1".to_string(),
        task_description: "Проверка собранных узлов".to_string(),
    }
}

/// Any surname, name, and patronymic separated by single spaces should pass,
/// regardless of what the individual tokens look like.
#[test]
fn property_three_token_names_are_accepted() {
    proptest!(|(
        surname in "[А-Яа-яA-Za-z-]{1,15}",
        name in "[А-Яа-яA-Za-z-]{1,15}",
        patronymic in "[А-Яа-яA-Za-z-]{1,15}",
    )| {
        let mut form = valid_foreman_form();
        form.full_name = format!("{} {} {}", surname, name, patronymic);
        prop_assert!(form.validate().is_ok());
    });
}

/// Fewer or more than three tokens should always be rejected with the
/// full-name message.
#[test]
fn property_wrong_token_count_is_rejected() {
    proptest!(|(
        tokens in prop::collection::vec("[А-Яа-я]{2,10}", 1..6),
    )| {
        prop_assume!(tokens.len() != 3);
        let mut form = valid_foreman_form();
        form.full_name = tokens.join(" ");
        let errors = form.validate().unwrap_err();
        prop_assert_eq!(errors[0].field.as_str(), "full_name");
        prop_assert_eq!(errors[0].message.as_str(), FULL_NAME_MESSAGE);
    });
}

/// Exactly eleven digits, with or without a leading plus, is a valid phone.
#[test]
fn property_eleven_digit_phones_are_accepted() {
    proptest!(|(
        digits in "[0-9]{11}",
        with_plus in any::<bool>(),
    )| {
        let mut form = valid_foreman_form();
        form.phone_number = if with_plus {
            format!("+{}", digits)
        } else {
            digits
        };
        prop_assert!(form.validate().is_ok());
    });
}

/// Any other digit count is rejected with the phone message.
#[test]
fn property_other_digit_counts_are_rejected() {
    proptest!(|(
        len in prop::sample::select(vec![1usize, 5, 10, 12, 15]),
    )| {
        let mut form = valid_foreman_form();
        form.phone_number = "7".repeat(len);
        let errors = form.validate().unwrap_err();
        prop_assert_eq!(errors[0].message.as_str(), PHONE_MESSAGE);
    });
}

/// Whenever the end time is strictly after the start time the order check
/// passes; whenever it is equal or earlier the form reports the order error
/// on the end_time field.
#[test]
fn property_time_order_is_enforced() {
    proptest!(|(
        start_offset in 0i64..100_000,
        delta in -5_000i64..5_000,
    )| {
        let base = parse_date_time("01.01.2025 00:00").unwrap();
        let start = base + Duration::minutes(start_offset);
        let end = start + Duration::minutes(delta);

        let mut form = valid_task_form();
        form.start_time = format_date_time(start);
        form.end_time = format_date_time(end);

        let result = form.validate();
        if delta > 0 {
            prop_assert!(result.is_ok());
        } else {
            let errors = result.unwrap_err();
            prop_assert_eq!(errors[0].field.as_str(), "end_time");
            prop_assert_eq!(errors[0].message.as_str(), TIME_ORDER_MESSAGE);
        }
    });
}

/// Positive integers parse as identifiers and survive surrounding
/// whitespace; zero and negatives never do.
#[test]
fn property_natural_ids_round_trip() {
    proptest!(|(id in 1i64..1_000_000)| {
        prop_assert_eq!(parse_natural_id(&id.to_string(), "id").unwrap(), id);
        prop_assert_eq!(parse_natural_id(&format!("  {}  ", id), "id").unwrap(), id);

        let negated = parse_natural_id(&(-id).to_string(), "id");
        let negated_err = negated.unwrap_err();
        prop_assert_eq!(negated_err.message.as_str(), NATURAL_ID_MESSAGE);
    });
}

/// Description length is checked in characters, so multi-byte Cyrillic text
/// near the bounds behaves the same as ASCII.
#[test]
fn property_description_bounds_count_characters() {
    proptest!(|(len in 1usize..600)| {
        let mut form = valid_task_form();
        form.task_description = "ы".repeat(len);
        let result = form.validate();
        if len < 5 {
            let errors = result.unwrap_err();
            prop_assert_eq!(errors[0].message.as_str(), DESCRIPTION_MIN_MESSAGE);
        } else if len > 500 {
            let errors = result.unwrap_err();
            prop_assert_eq!(errors[0].message.as_str(), DESCRIPTION_MAX_MESSAGE);
        } else {
            prop_assert!(result.is_ok());
        }
    });
}

/// Validation must never panic, whatever the user typed into the form.
#[test]
fn property_validation_never_panics() {
    proptest!(|(
        full_name in ".*",
        gender in ".*",
        workshop in ".*",
        phone_number in ".*",
    )| {
        let form = ForemanCreateForm {
            full_name,
            gender,
            workshop,
            phone_number,
        };
        let _ = form.validate();
    });
}

/// Every reported error names a field from the form it came from.
#[test]
fn property_errors_reference_known_fields() {
    proptest!(|(
        start in ".{0,20}",
        end in ".{0,20}",
        description in ".{0,30}",
    )| {
        let form = TaskCreateForm {
            start_time: start,
            end_time: end,
            workshop: "x".to_string(),
            foreman_id: "x".to_string(),
            technician_id: "x".to_string(),
            task_description: description,
        };
        if let Err(errors) = form.validate() {
            let known = [
                "start_time",
                "end_time",
                "workshop",
                "foreman_id",
                "technician_id",
                "task_description",
            ];
            for error in errors {
                prop_assert!(known.contains(&error.field.as_str()));
            }
        }
    });
}
