// ============================================================
// Layer 1 — Interactive Form
// ============================================================
// A terminal questionnaire built from the feature schema.
//
//   numeric      → bounded prompt, empty input takes the default,
//                  anything out of range is asked again
//   categorical  → numbered menu of the allowed values; answer with
//                  the number or the exact value, empty takes the first
//   placeholder  → never asked, filled with its default
//
// Only legal values can leave the form, so the record builder
// always succeeds on what `collect` returns.
//
// Input and output are generic so tests can script a session.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use crossterm::{
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use serde_json::{Map, Value};

use crate::domain::schema::{FeatureSchema, FieldKind, FieldSpec};
use crate::domain::{IncomeLabel, PredictionResult};

pub struct IncomeForm<R, W> {
    schema: FeatureSchema,
    input:  R,
    output: W,
}

impl<R: BufRead, W: Write> IncomeForm<R, W> {
    pub fn new(schema: FeatureSchema, input: R, output: W) -> Self {
        Self { schema, input, output }
    }

    /// Ask for every field in schema order and return the answers.
    pub fn collect(&mut self) -> Result<Map<String, Value>> {
        let mut values = Map::new();

        for field in self.schema.fields() {
            let value = match field.kind {
                FieldKind::Numeric     => Value::from(self.ask_number(field)?),
                FieldKind::Categorical => Value::from(self.ask_category(field)?),
                FieldKind::Placeholder => match field.default {
                    Some(default) => Value::from(default),
                    None => continue,
                },
            };
            values.insert(field.name.to_string(), value);
        }

        Ok(values)
    }

    fn ask_number(&mut self, field: &FieldSpec) -> Result<i64> {
        loop {
            match field.bounds {
                Some(b) => self.prompt(field.name, &format!("[{}-{}] (default {})", b.min, b.max, b.default))?,
                None    => self.prompt(field.name, "")?,
            }

            let answer = self.read_answer()?;
            if answer.is_empty() {
                if let Some(b) = field.bounds {
                    return Ok(b.default);
                }
            }

            match (answer.parse::<i64>(), field.bounds) {
                (Ok(n), Some(b)) if b.contains(n) => return Ok(n),
                (Ok(n), None) => return Ok(n),
                (Ok(_), Some(b)) => self.complain(&format!("must be between {} and {}", b.min, b.max))?,
                (Err(_), _) => self.complain("please enter a whole number")?,
            }
        }
    }

    fn ask_category(&mut self, field: &FieldSpec) -> Result<&'static str> {
        let options = field.allowed_values;
        let Some(&first) = options.first() else {
            bail!("field '{}' has no allowed values", field.name);
        };

        writeln!(self.output)?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {:>2}) {option}", i + 1)?;
        }

        loop {
            self.prompt(field.name, &format!("[1-{}] (default {first})", options.len()))?;

            let answer = self.read_answer()?;
            if answer.is_empty() {
                return Ok(first);
            }

            let by_number = answer
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| options.get(i));
            let by_name = options.iter().find(|&&option| option == answer);

            match by_number.or(by_name) {
                Some(&option) => return Ok(option),
                None => self.complain("not one of the listed options")?,
            }
        }
    }

    fn prompt(&mut self, name: &str, hint: &str) -> io::Result<()> {
        queue!(
            self.output,
            SetForegroundColor(Color::Cyan),
            Print(name),
            ResetColor,
            Print(format!(" {hint}: "))
        )?;
        self.output.flush()
    }

    fn complain(&mut self, message: &str) -> io::Result<()> {
        queue!(
            self.output,
            SetForegroundColor(Color::Red),
            Print(format!("  {message}\n")),
            ResetColor
        )?;
        self.output.flush()
    }

    fn read_answer(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("Cannot read form input")?;
        if read == 0 {
            bail!("input closed before the form was complete");
        }
        Ok(line.trim().to_string())
    }
}

/// Print the predicted label: green for <=50K, yellow for >50K.
pub fn render<W: Write>(out: &mut W, result: &PredictionResult) -> io::Result<()> {
    let colour = match result.label {
        IncomeLabel::AtMost50K => Color::Green,
        IncomeLabel::Above50K  => Color::Yellow,
    };

    queue!(
        out,
        Print("\nPredicted income: "),
        SetForegroundColor(colour),
        SetAttribute(Attribute::Bold),
        Print(result.label),
        SetAttribute(Attribute::Reset),
        ResetColor,
        Print("\n")
    )?;
    out.flush()
}
