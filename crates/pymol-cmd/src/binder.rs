//! Binding argument tokens to a command's declared parameters

use crate::args::{ArgValue, BoundArgs, InstanceId, ParamSpec, ParseMode, Token, CONTEXT_PARAM};
use crate::error::BindError;
use crate::feedback::{Feedback, FeedbackMask, FeedbackModule};
use crate::usage::format_usage;

/// Binds tokens for one command invocation
///
/// # Example
/// ```
/// use pymol_cmd::{tokenize, Binder, FeedbackState, InstanceId, ParamSpec, ParseMode};
///
/// let spec = ParamSpec::new().required("name").optional("value", Some("1")).context();
/// let feedback = FeedbackState::new();
/// let binder = Binder::new("set", &spec, &feedback, InstanceId(1));
///
/// let tokens = tokenize("sphere_scale, 0.5", ParseMode::Strict).unwrap();
/// let bound = binder.bind(tokens).unwrap();
/// assert_eq!(bound.get("value").and_then(|v| v.as_str()), Some("0.5"));
/// ```
pub struct Binder<'a> {
    command: &'a str,
    spec: &'a ParamSpec,
    mode: ParseMode,
    feedback: &'a dyn Feedback,
    instance: InstanceId,
}

impl<'a> Binder<'a> {
    pub fn new(
        command: &'a str,
        spec: &'a ParamSpec,
        feedback: &'a dyn Feedback,
        instance: InstanceId,
    ) -> Self {
        Self {
            command,
            spec,
            mode: ParseMode::Strict,
            feedback,
            instance,
        }
    }

    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Usage line for this command
    pub fn usage(&self) -> String {
        format_usage(self.command, self.spec.names(), self.spec.required_count())
    }

    /// Bind tokens to parameters
    ///
    /// In checked modes every value travels as a keyword. A lone `?` yields
    /// [`BindError::UsageRequested`] whatever the mode.
    pub fn bind(&self, tokens: Vec<Token>) -> Result<BoundArgs, BindError> {
        if let [only] = tokens.as_slice() {
            if only.is_usage_request() {
                return Err(BindError::UsageRequested {
                    usage: self.usage(),
                });
            }
        }

        let mode = if self.spec.is_variadic() {
            ParseMode::NoCheck
        } else {
            self.mode
        };

        let bound = match mode {
            ParseMode::NoCheck => self.bind_unchecked(tokens),
            ParseMode::Legacy => self.bind_checked(self.legacy_rewrite(tokens))?,
            ParseMode::Strict | ParseMode::Literal(_) => self.bind_checked(tokens)?,
        };

        if self
            .feedback
            .feedback(FeedbackModule::Parser, FeedbackMask::DEBUGGING)
        {
            log::debug!(" parsing-DEBUG: kw: {}", bound);
        }
        Ok(bound)
    }

    /// `word=value` where `word` is not a parameter becomes `word, value`
    fn legacy_rewrite(&self, tokens: Vec<Token>) -> Vec<Token> {
        let mut rewritten = Vec::with_capacity(tokens.len());
        for token in tokens {
            match token.name.as_deref() {
                Some(name) if !self.spec.contains(name) => {
                    rewritten.push(Token::positional(name));
                    rewritten.push(Token {
                        name: None,
                        value: token.value,
                    });
                }
                _ => rewritten.push(token),
            }
        }
        rewritten
    }

    fn bind_unchecked(&self, tokens: Vec<Token>) -> BoundArgs {
        let mut bound = BoundArgs::new();
        for token in tokens {
            match token.name {
                None => bound.positional.push(token.value.into()),
                Some(name) => bound.insert(name, token.value.into()),
            }
        }

        self.inject_quiet(&mut bound);
        if !bound.contains(CONTEXT_PARAM) {
            bound.insert(CONTEXT_PARAM, ArgValue::Instance(self.instance));
        }
        bound
    }

    fn bind_checked(&self, tokens: Vec<Token>) -> Result<BoundArgs, BindError> {
        let declared = self.spec.len();
        let required = self.spec.required_count();

        if tokens.len() > declared {
            return Err(BindError::TooManyArguments {
                command: self.command.to_string(),
                required,
                declared,
                found: tokens.len(),
                usage: self.usage(),
            });
        }

        // The position advances for named tokens as well
        let mut bound = BoundArgs::new();
        for (position, token) in tokens.into_iter().enumerate() {
            match token.name {
                None => {
                    let param = self
                        .spec
                        .params()
                        .get(position)
                        .ok_or_else(|| BindError::AmbiguousArgument {
                            value: token.value.clone(),
                        })?;
                    bound.insert(param.name, token.value.into());
                }
                Some(name) => bound.insert(name, token.value.into()),
            }
        }

        if let Some(missing) = self.spec.params()[..required]
            .iter()
            .find(|p| !bound.contains(p.name))
        {
            return Err(BindError::MissingRequired {
                command: self.command.to_string(),
                param: missing.name.to_string(),
            });
        }

        if let Some(unknown) = bound.keyword_names().find(|n| !self.spec.contains(n)) {
            return Err(BindError::UnknownName {
                command: self.command.to_string(),
                param: unknown.to_string(),
            });
        }

        if self.spec.contains("quiet") {
            self.inject_quiet(&mut bound);
        }
        if self.spec.declares_context() && !bound.contains(CONTEXT_PARAM) {
            bound.insert(CONTEXT_PARAM, ArgValue::Instance(self.instance));
        }
        Ok(bound)
    }

    /// Default `quiet` from the command module's results flag, unless given
    fn inject_quiet(&self, bound: &mut BoundArgs) {
        if !self.spec.contains("quiet") || bound.contains("quiet") {
            return;
        }
        let results = self
            .feedback
            .feedback(FeedbackModule::Cmd, FeedbackMask::RESULTS);
        bound.insert("quiet", ArgValue::from(if results { "0" } else { "1" }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::FeedbackState;
    use crate::parser::tokenize;

    const ID: InstanceId = InstanceId(3);

    fn op_spec() -> ParamSpec {
        ParamSpec::new()
            .required("name")
            .optional("value", None)
            .optional("flag", None)
    }

    fn bind(spec: &ParamSpec, mode: ParseMode, line: &str) -> Result<BoundArgs, BindError> {
        let feedback = FeedbackState::new();
        Binder::new("op", spec, &feedback, ID)
            .with_mode(mode)
            .bind(tokenize(line, mode).unwrap())
    }

    fn text<'b>(bound: &'b BoundArgs, name: &str) -> Option<&'b str> {
        bound.get(name).and_then(|v| v.as_str())
    }

    #[test]
    fn test_positional_binding() {
        let bound = bind(&op_spec(), ParseMode::Strict, "a, b").unwrap();
        assert_eq!(text(&bound, "name"), Some("a"));
        assert_eq!(text(&bound, "value"), Some("b"));
        assert!(!bound.contains("flag"));
        assert!(bound.positional.is_empty());
    }

    #[test]
    fn test_position_advances_past_named_tokens() {
        // `x` takes position 1 after the named token, not position 0
        let bound = bind(&op_spec(), ParseMode::Strict, "name=n, x").unwrap();
        assert_eq!(text(&bound, "name"), Some("n"));
        assert_eq!(text(&bound, "value"), Some("x"));

        // the positional token overrides the earlier named one
        let bound = bind(&op_spec(), ParseMode::Strict, "value=v, n, w").unwrap();
        assert_eq!(text(&bound, "name"), Some("n"));
        assert_eq!(text(&bound, "value"), Some("w"));
    }

    #[test]
    fn test_too_many_arguments() {
        let err = bind(&op_spec(), ParseMode::Strict, "a, b, c, d").unwrap_err();
        assert_eq!(
            err,
            BindError::TooManyArguments {
                command: "op".to_string(),
                required: 1,
                declared: 3,
                found: 4,
                usage: "Usage: op name [, value [, flag ]]".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_required() {
        let spec = ParamSpec::new().required("a").required("b").optional("c", None);
        let err = bind(&spec, ParseMode::Strict, "c=1").unwrap_err();
        assert_eq!(
            err,
            BindError::MissingRequired {
                command: "op".to_string(),
                param: "a".to_string()
            }
        );
        let err = bind(&spec, ParseMode::Strict, "1").unwrap_err();
        assert!(matches!(err, BindError::MissingRequired { ref param, .. } if param == "b"));
    }

    #[test]
    fn test_positional_can_reach_context_slot() {
        // the context slot counts toward the arity and keeps a supplied value
        let spec = ParamSpec::new().optional("a", None).context();
        let bound = bind(&spec, ParseMode::Strict, "1, other").unwrap();
        assert_eq!(text(&bound, "a"), Some("1"));
        assert_eq!(text(&bound, CONTEXT_PARAM), Some("other"));

        let bound = bind(&spec, ParseMode::Strict, "a=1, b").map(|b| b.to_string());
        assert_eq!(bound.unwrap(), "{'a': '1', '_self': 'b'}");
    }

    #[test]
    fn test_unknown_name() {
        let err = bind(&op_spec(), ParseMode::Strict, "n, colour=red").unwrap_err();
        assert_eq!(
            err,
            BindError::UnknownName {
                command: "op".to_string(),
                param: "colour".to_string()
            }
        );
    }

    #[test]
    fn test_legacy_rewrite() {
        let spec = ParamSpec::new().required("arg1").optional("arg2", None);
        let bound = bind(&spec, ParseMode::Legacy, "foo=bar").unwrap();
        assert_eq!(text(&bound, "arg1"), Some("foo"));
        assert_eq!(text(&bound, "arg2"), Some("bar"));

        // declared names are left alone
        let bound = bind(&spec, ParseMode::Legacy, "arg2=x, arg1=y").unwrap();
        assert_eq!(text(&bound, "arg1"), Some("y"));
    }

    #[test]
    fn test_usage_request() {
        let err = bind(&op_spec(), ParseMode::Strict, "?").unwrap_err();
        assert!(err.is_usage_request());
        assert_eq!(err.diagnostic(), vec!["Usage: op name [, value [, flag ]]"]);

        let err = bind(&ParamSpec::new().variadic(), ParseMode::NoCheck, "?").unwrap_err();
        assert!(err.is_usage_request());
    }

    #[test]
    fn test_quiet_follows_results_feedback() {
        let spec = op_spec().optional("quiet", Some("1"));
        let feedback = FeedbackState::new();
        let binder = Binder::new("op", &spec, &feedback, ID);

        let bound = binder.bind(vec![Token::positional("n")]).unwrap();
        assert_eq!(text(&bound, "quiet"), Some("0"));

        feedback.disable(FeedbackModule::Cmd, FeedbackMask::RESULTS);
        let bound = binder.bind(vec![Token::positional("n")]).unwrap();
        assert_eq!(text(&bound, "quiet"), Some("1"));

        // never overrides the caller
        feedback.enable(FeedbackModule::Cmd, FeedbackMask::RESULTS);
        let bound = binder
            .bind(vec![Token::positional("n"), Token::named("quiet", "1")])
            .unwrap();
        assert_eq!(text(&bound, "quiet"), Some("1"));
    }

    #[test]
    fn test_context_injection() {
        let spec = op_spec().context();
        let bound = bind(&spec, ParseMode::Strict, "n").unwrap();
        assert_eq!(bound.get(CONTEXT_PARAM), Some(&ArgValue::Instance(ID)));

        let bound = bind(&op_spec(), ParseMode::Strict, "n").unwrap();
        assert!(!bound.contains(CONTEXT_PARAM));
    }

    #[test]
    fn test_no_check_mode() {
        let spec = ParamSpec::new().required("a").variadic();
        let bound = bind(&spec, ParseMode::Strict, "1, 2, ,k=v, 3").unwrap();
        assert_eq!(
            bound.positional,
            vec!["1".into(), "2".into(), ArgValue::None, "3".into()]
        );
        assert_eq!(text(&bound, "k"), Some("v"));
        // always receives the instance
        assert_eq!(bound.get(CONTEXT_PARAM), Some(&ArgValue::Instance(ID)));
    }
}
