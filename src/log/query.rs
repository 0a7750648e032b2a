//! Read-only queries over a parsed log model
//!
//! Lookup by name spans both tables, step variables first. Step filtering
//! compares by coerced type and value, so the caller's text is pushed
//! through the same coercion the parser applied.

use super::parser::LogReader;
use crate::error::LtstepsError;
use crate::value::{CoercedValue, try_convert_value};
use crate::Result;

impl LogReader {
    /// Step variable names, in declaration order
    pub fn step_names(&self) -> impl Iterator<Item = &str> {
        self.steps.names()
    }

    /// Measurement column names, in the order they were read
    pub fn measure_names(&self) -> impl Iterator<Item = &str> {
        self.measures.names()
    }

    /// Look up a sequence by name: a step variable if one exists, else a
    /// measurement column
    pub fn lookup(&self, name: &str) -> Result<&[CoercedValue]> {
        self.steps
            .get(name)
            .or_else(|| self.measures.get(name))
            .ok_or_else(|| LtstepsError::name_not_found(name))
    }

    /// Zero-based step indices where `param` equals `value`
    ///
    /// `value` is coerced before comparison; `"2"` matches a step declared
    /// as `x=2` but not one declared as `x=2.0`.
    pub fn steps_with_parameter_equal(&self, param: &str, value: &str) -> Result<Vec<usize>> {
        let sequence = self
            .steps
            .get(param)
            .ok_or_else(|| LtstepsError::name_not_found(param))?;
        let wanted = try_convert_value(value);
        Ok(sequence
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == wanted)
            .map(|(i, _)| i)
            .collect())
    }

    /// Step indices satisfying every `(param, value)` equality condition
    ///
    /// The result keeps the order of the first condition's matches. At least
    /// one condition is required.
    pub fn steps_with_conditions(&self, conditions: &[(&str, &str)]) -> Result<Vec<usize>> {
        if conditions.is_empty() {
            return Err(LtstepsError::configuration(
                "at least one step condition is required",
            ));
        }

        let mut current: Option<Vec<usize>> = None;
        for (param, value) in conditions {
            let matches = self.steps_with_parameter_equal(param, value)?;
            current = Some(match current {
                None => matches,
                Some(kept) => kept.into_iter().filter(|i| matches.contains(i)).collect(),
            });
        }
        Ok(current.unwrap_or_default())
    }

    /// One measurement value
    ///
    /// Without a step the column must hold exactly one value; stepped data
    /// requires the step index.
    pub fn get_measure_value(&self, measure: &str, step: Option<usize>) -> Result<&CoercedValue> {
        let column = self
            .measures
            .get(measure)
            .ok_or_else(|| LtstepsError::name_not_found(measure))?;

        match step {
            None if column.len() == 1 => Ok(&column[0]),
            None => Err(LtstepsError::AmbiguousStep {
                name: measure.to_string(),
            }),
            Some(step) => column.get(step).ok_or_else(|| LtstepsError::StepOutOfRange {
                name: measure.to_string(),
                step,
                len: column.len(),
            }),
        }
    }

    /// Measurement values projected at the given steps
    ///
    /// `None` returns the whole column. The projection follows the caller's
    /// order and is not deduplicated.
    pub fn get_measure_values_at_steps(
        &self,
        measure: &str,
        steps: Option<&[usize]>,
    ) -> Result<Vec<CoercedValue>> {
        let column = self
            .measures
            .get(measure)
            .ok_or_else(|| LtstepsError::name_not_found(measure))?;

        match steps {
            None => Ok(column.to_vec()),
            Some(steps) => steps
                .iter()
                .map(|&step| {
                    column
                        .get(step)
                        .cloned()
                        .ok_or_else(|| LtstepsError::StepOutOfRange {
                            name: measure.to_string(),
                            step,
                            len: column.len(),
                        })
                })
                .collect(),
        }
    }
}
