//! Interactive form: asks for each field in order, then re-asks only the
//! fields that failed until the calculator accepts the input.

use std::io::{BufRead, Write};

use calc_core::{CalculatorSession, FieldKind, FieldSchema};

use crate::error::CliError;
use crate::view;

pub fn fill_session<R: BufRead, W: Write>(
    session: &mut CalculatorSession<'_>,
    reader: &mut R,
    writer: &mut W,
) -> Result<(), CliError> {
    let definition = session.definition();
    let mut pending: Vec<&FieldSchema> = definition.fields().iter().collect();

    loop {
        for field in &pending {
            write!(writer, "{}", prompt_line(field))?;
            writer.flush()?;

            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                return Err(CliError::Aborted);
            }
            match resolve_answer(field, line.trim()) {
                Some(value) => session.set(field.id, value),
                None => session.clear(field.id),
            }
        }

        match session.submit() {
            Ok(_) => return Ok(()),
            Err(err) if err.is_user_correctable() => {
                writeln!(writer, "\n{}", view::render_error(&err, calc_core::registry::global()))?;
                pending = definition
                    .fields()
                    .iter()
                    .filter(|f| session.field_issue(f.id).is_some())
                    .collect();
                if pending.is_empty() {
                    return Err(err.into());
                }
            }
            Err(err) => return Err(err.into()),
        }
    }
}

/// Question text for one field, e.g. `Body weight [kg] (number <= 500): `
fn prompt_line(field: &FieldSchema) -> String {
    let mut line = field.label.to_string();
    if let Some(unit) = field.unit {
        line.push_str(&format!(" [{}]", unit));
    }

    match &field.kind {
        FieldKind::Choice { options } => {
            let listed: Vec<String> = options
                .iter()
                .enumerate()
                .map(|(i, opt)| format!("{}) {}", i + 1, opt.label))
                .collect();
            line.push_str(&format!("\n  {}\n ", listed.join("\n  ")));
        }
        _ => line.push_str(&format!(" ({})", field.constraint_summary())),
    }

    match (field.default, field.required) {
        (Some(default), _) => line.push_str(&format!(" [default {}]", default.to_value())),
        (None, false) => line.push_str(" [optional]"),
        (None, true) => {}
    }
    line.push_str(": ");
    line
}

/// Blank means "not supplied". A choice may be answered by its menu number.
fn resolve_answer(field: &FieldSchema, answer: &str) -> Option<String> {
    if answer.is_empty() {
        return None;
    }
    let options = field.options();
    let by_number = answer
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=options.len()).contains(n))
        .map(|n| options[n - 1].value.to_string());
    Some(by_number.unwrap_or_else(|| answer.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_core::registry;
    use std::io::Cursor;

    #[test]
    fn test_choice_by_number() {
        let bmr = registry::global().get("bmr").unwrap();
        let sex = bmr.field_by_id("sex").unwrap();
        assert_eq!(resolve_answer(sex, "2").as_deref(), Some("female"));
        assert_eq!(resolve_answer(sex, "Male").as_deref(), Some("Male"));
        assert_eq!(resolve_answer(sex, "7").as_deref(), Some("7"));
        assert_eq!(resolve_answer(sex, ""), None);

        let weight = bmr.field_by_id("weightKg").unwrap();
        assert_eq!(resolve_answer(weight, "1").as_deref(), Some("1"));
    }

    #[test]
    fn test_prompt_line_mentions_unit_and_default() {
        let meal = registry::global().get("meal").unwrap();
        let line = prompt_line(meal.field_by_id("proteinPercent").unwrap());
        assert!(line.starts_with("Protein [%]"));
        assert!(line.contains("[default 30]"));
    }

    #[test]
    fn test_fill_reasks_failed_fields() {
        let mut session = CalculatorSession::open(registry::global(), "owen").unwrap();
        // weight, sex, age, activity; then the bad weight again
        let mut input = Cursor::new("heavy\n1\n\n\n70\n");
        let mut output = Vec::new();

        fill_session(&mut session, &mut input, &mut output).unwrap();

        assert_eq!(session.result().unwrap().number("rmr"), Some(1593.0));
        let transcript = String::from_utf8(output).unwrap();
        assert!(transcript.contains("Please correct the following"));
        assert_eq!(transcript.matches("Body weight").count(), 3);
    }

    #[test]
    fn test_fill_aborts_on_eof() {
        let mut session = CalculatorSession::open(registry::global(), "bmr").unwrap();
        let mut input = Cursor::new("70\n");
        let mut output = Vec::new();
        let err = fill_session(&mut session, &mut input, &mut output).unwrap_err();
        assert!(matches!(err, CliError::Aborted));
    }
}
