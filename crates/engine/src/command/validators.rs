//! Reusable structural validators.
//!
//! None of these touch the network, so they belong at the front of a
//! pipeline.

use graphctl_types::{ArgumentBag, ValidationOutcome};
use graphctl_util::is_valid_guid;

use super::validator::{FnValidator, Validator};

/// Wrap a synchronous check.
pub fn check<F>(check: F) -> FnValidator<F>
where
    F: Fn(&ArgumentBag) -> ValidationOutcome + Send + Sync,
{
    FnValidator::new(check)
}

/// When `option` is supplied it must be a GUID.
pub fn guid(option: &'static str) -> impl Validator {
    check(move |args: &ArgumentBag| match args.get_str(option) {
        Some(value) if !is_valid_guid(value) => ValidationOutcome::reject(format!("{} is not a valid GUID", value)),
        _ => ValidationOutcome::Accepted,
    })
}

/// `first` and `second` may not both be supplied. Supplying neither is fine.
pub fn mutually_exclusive(first: &'static str, second: &'static str) -> impl Validator {
    check(move |args: &ArgumentBag| {
        if args.is_set(first) && args.is_set(second) {
            ValidationOutcome::reject(format!("Specify either {} or {}, but not both", first, second))
        } else {
            ValidationOutcome::Accepted
        }
    })
}

/// Exactly one of `first` and `second` must be supplied.
pub fn exactly_one_of(first: &'static str, second: &'static str) -> impl Validator {
    check(move |args: &ArgumentBag| match (args.is_set(first), args.is_set(second)) {
        (true, false) | (false, true) => ValidationOutcome::Accepted,
        (false, false) => ValidationOutcome::reject(format!("Specify either {} or {}", first, second)),
        (true, true) => ValidationOutcome::reject(format!("Specify either {} or {}, but not both", first, second)),
    })
}

/// No more than one of `options` may be supplied.
pub fn at_most_one_of(options: &'static [&'static str]) -> impl Validator {
    check(move |args: &ArgumentBag| {
        let supplied: Vec<&str> = options.iter().copied().filter(|option| args.is_set(option)).collect();
        if supplied.len() > 1 {
            ValidationOutcome::reject(format!("Specify only one of {}", join_options(options)))
        } else {
            ValidationOutcome::Accepted
        }
    })
}

/// When `option` is supplied its value must be one of `allowed`.
pub fn allowed_values(option: &'static str, allowed: &'static [&'static str]) -> impl Validator {
    check(move |args: &ArgumentBag| match args.get_str(option) {
        Some(value) if !allowed.contains(&value) => ValidationOutcome::reject(format!(
            "'{}' is not a valid {} value. Allowed values are {}",
            value,
            option,
            allowed.join(", ")
        )),
        _ => ValidationOutcome::Accepted,
    })
}

fn join_options(options: &[&str]) -> String {
    match options.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
        Some((last, _)) => (*last).to_string(),
        None => String::new(),
    }
}
