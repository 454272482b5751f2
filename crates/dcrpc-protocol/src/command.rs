//! Command values handed to the dispatcher.

use serde::Serialize;
use serde_json::Value;

use crate::error::ProtocolError;

/// An immutable remote call: a method name and its positional parameters.
///
/// Parameters are stored already converted to JSON, so a built command can
/// always be put on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    method: String,
    params: Vec<Value>,
}

impl Command {
    /// Creates a command without parameters.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: Vec::new(),
        }
    }

    /// Starts building a command with parameters.
    pub fn builder(method: impl Into<String>) -> CommandBuilder {
        CommandBuilder {
            method: method.into(),
            params: Vec::new(),
            trailing_omitted: 0,
            error: None,
        }
    }

    /// The remote method name.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The positional parameters.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub(crate) fn into_parts(self) -> (String, Vec<Value>) {
        (self.method, self.params)
    }
}

/// Builder for [`Command`].
///
/// Conversion failures do not abort the chain; the first one is kept and
/// reported by [`CommandBuilder::build`].
#[derive(Debug)]
pub struct CommandBuilder {
    method: String,
    params: Vec<Value>,
    trailing_omitted: usize,
    error: Option<ProtocolError>,
}

impl CommandBuilder {
    /// Appends a required parameter.
    pub fn param<P: Serialize + ?Sized>(mut self, param: &P) -> Self {
        if self.error.is_some() {
            return self;
        }
        match serde_json::to_value(param) {
            Ok(value) => {
                self.params.push(value);
                self.trailing_omitted = 0;
            }
            Err(e) => {
                self.error = Some(ProtocolError::InvalidParameter {
                    method: self.method.clone(),
                    index: self.params.len(),
                    reason: e.to_string(),
                });
            }
        }
        self
    }

    /// Appends an optional parameter.
    ///
    /// `None` values in the trailing position are omitted from the wire form;
    /// a `None` followed by a present value is sent as `null`.
    pub fn optional_param<P: Serialize>(self, param: Option<&P>) -> Self {
        match param {
            Some(value) => self.param(value),
            None => {
                let mut this = self;
                if this.error.is_none() {
                    this.params.push(Value::Null);
                    this.trailing_omitted += 1;
                }
                this
            }
        }
    }

    /// Finishes the command, or returns the first parameter conversion failure.
    pub fn build(mut self) -> Result<Command, ProtocolError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let keep = self.params.len() - self.trailing_omitted;
        self.params.truncate(keep);
        Ok(Command {
            method: self.method,
            params: self.params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_command_without_params() {
        let command = Command::new("getmininginfo");
        assert_eq!(command.method(), "getmininginfo");
        assert!(command.params().is_empty());
    }

    #[test]
    fn test_builder_keeps_order() {
        let command = Command::builder("setgenerate")
            .param(&true)
            .param(&4)
            .build()
            .unwrap();
        assert_eq!(command.params(), &[json!(true), json!(4)]);
    }

    #[test]
    fn test_trailing_optional_params_are_omitted() {
        let command = Command::builder("getnetworkhashps")
            .optional_param::<i32>(None)
            .optional_param::<i32>(None)
            .build()
            .unwrap();
        assert!(command.params().is_empty());

        let command = Command::builder("getnetworkhashps")
            .optional_param(Some(&120))
            .optional_param::<i32>(None)
            .build()
            .unwrap();
        assert_eq!(command.params(), &[json!(120)]);
    }

    #[test]
    fn test_inner_optional_param_is_null() {
        let command = Command::builder("getnetworkhashps")
            .optional_param::<i32>(None)
            .optional_param(Some(&1000))
            .build()
            .unwrap();
        assert_eq!(command.params(), &[Value::Null, json!(1000)]);
    }

    #[test]
    fn test_first_conversion_failure_is_reported() {
        // Maps with non-string keys have no JSON form.
        let mut bad = HashMap::new();
        bad.insert(vec![1u8], 1u8);

        let err = Command::builder("submitblock")
            .param("00ff")
            .param(&bad)
            .param(&1)
            .build()
            .unwrap_err();
        match err {
            ProtocolError::InvalidParameter { method, index, .. } => {
                assert_eq!(method, "submitblock");
                assert_eq!(index, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
