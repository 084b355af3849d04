use crate::error::ParseErrorKind;
use crate::spec::{ExtraSpec, PositionalSpec};
use crate::value::Value;
use indexmap::IndexMap;

/// Assigns positional tokens to declared slots, then to the extra sink.
#[derive(Debug)]
pub(crate) struct PositionalResolver<'s> {
    slots: &'s [PositionalSpec],
    extra: Option<&'s ExtraSpec>,
    values: IndexMap<String, Value>,
    extra_values: Vec<Value>,
}

impl<'s> PositionalResolver<'s> {
    pub(crate) fn new(slots: &'s [PositionalSpec], extra: Option<&'s ExtraSpec>) -> Self {
        Self {
            slots,
            extra,
            values: IndexMap::new(),
            extra_values: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, raw: &str) -> Result<(), ParseErrorKind> {
        if let Some(slot) = self.slots.get(self.values.len()) {
            let value = convert(slot.value_parser().parse(raw), slot.name(), raw)?;
            self.values.insert(slot.name().to_string(), value);
            return Ok(());
        }

        let Some(extra) = self.extra else {
            return Err(ParseErrorKind::ExtraPositional(raw.to_string()));
        };
        let value = convert(extra.value_parser().parse(raw), extra.name(), raw)?;
        self.extra_values.push(value);
        Ok(())
    }

    /// Check that every required slot was filled.
    pub(crate) fn finish(self) -> Result<(IndexMap<String, Value>, Vec<Value>), ParseErrorKind> {
        // Required slots precede optional ones, so a count is enough.
        let required = self.slots.iter().filter(|s| s.is_required()).count();
        if self.values.len() < required {
            return Err(ParseErrorKind::MissingPositional {
                required,
                given: self.values.len(),
            });
        }
        Ok((self.values, self.extra_values))
    }
}

fn convert(result: Result<Value, String>, name: &str, raw: &str) -> Result<Value, ParseErrorKind> {
    result.map_err(|reason| ParseErrorKind::InvalidValue {
        target: format!("<{name}>"),
        value: raw.to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::PositionalResolver;
    use crate::error::ParseErrorKind;
    use crate::spec::{ExtraSpec, PositionalSpec};
    use crate::value::{Value, ValueParser};

    #[test]
    fn fills_slots_then_extra() {
        let slots = vec![
            PositionalSpec::new("a", ""),
            PositionalSpec::new("b", "").parser(ValueParser::integer()),
        ];
        let extra = ExtraSpec::new("rest", "");
        let mut resolver = PositionalResolver::new(&slots, Some(&extra));
        for raw in ["x", "2", "y", "z"] {
            resolver.push(raw).unwrap();
        }

        let (values, rest) = resolver.finish().unwrap();
        assert_eq!(values.get("a"), Some(&Value::from("x")));
        assert_eq!(values.get("b"), Some(&Value::Integer(2)));
        assert_eq!(rest, vec![Value::from("y"), Value::from("z")]);
    }

    #[test]
    fn overflow_without_extra_fails() {
        let slots = vec![PositionalSpec::new("a", "")];
        let mut resolver = PositionalResolver::new(&slots, None);
        resolver.push("x").unwrap();
        assert_eq!(
            resolver.push("y"),
            Err(ParseErrorKind::ExtraPositional("y".to_string()))
        );
    }

    #[test]
    fn optional_slots_may_stay_empty() {
        let slots = vec![
            PositionalSpec::new("a", ""),
            PositionalSpec::new("b", "").optional(),
        ];
        let mut resolver = PositionalResolver::new(&slots, None);
        resolver.push("x").unwrap();
        let (values, _) = resolver.finish().unwrap();
        assert_eq!(values.len(), 1);

        let resolver = PositionalResolver::new(&slots, None);
        assert_eq!(
            resolver.finish(),
            Err(ParseErrorKind::MissingPositional {
                required: 1,
                given: 0
            })
        );
    }

    #[test]
    fn conversion_failure_names_the_slot() {
        let slots = vec![PositionalSpec::new("count", "").parser(ValueParser::integer())];
        let mut resolver = PositionalResolver::new(&slots, None);
        let err = resolver.push("many").unwrap_err();
        assert!(err.to_string().starts_with("invalid value \"many\" for <count>"));
    }
}
