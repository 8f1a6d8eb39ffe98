// ABOUTME: Form session tying a rule engine to a group of validatable fields
// ABOUTME: Runs populate, validate and split in one call and keeps the last result

use crate::group::Validatables;
use crate::rules::{RuleDescriptor, RuleEngine};
use crate::split::{split_group, OverallResult};
use crate::Result;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// Validation session over data type `T`
pub struct Form<T, E> {
    engine: E,
    fields: Validatables,
    result: OverallResult,
    _model: PhantomData<fn() -> T>,
}

impl<T, E: RuleEngine<T>> Form<T, E> {
    pub fn new(engine: E, fields: Validatables) -> Self {
        Self {
            engine,
            fields,
            result: OverallResult::default(),
            _model: PhantomData,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn fields(&self) -> &Validatables {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut Validatables {
        &mut self.fields
    }

    /// Result of the last validation, all-valid before the first one
    pub fn result(&self) -> &OverallResult {
        &self.result
    }

    /// Validate an explicitly built model and apply the failures to the fields
    pub fn validate_model(&mut self, model: &T) -> &OverallResult {
        let mut failures = self.engine.run_rules(model);
        self.result = split_group(&mut failures, &mut self.fields);
        &self.result
    }

    /// Like [`Form::validate_model`] but only runs rules for the form's own fields
    pub fn validate_model_scoped(&mut self, model: &T) -> &OverallResult {
        let names = self.fields.field_names();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut failures = self.engine.run_rules_for(model, &names);
        self.result = split_group(&mut failures, &mut self.fields);
        &self.result
    }

    /// Rules declared for the form's fields
    pub fn scoped_rules(&self) -> Vec<RuleDescriptor> {
        let names = self.fields.field_names();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        self.engine.rules_for_fields(&names)
    }

    /// Clear fields via a directive (blank clears validation only) and reset the result
    pub fn clear_validation(&mut self, directive: &str) -> Result<()> {
        self.fields.clear_with(directive)?;
        self.result.clear();
        Ok(())
    }
}

impl<T: DeserializeOwned, E: RuleEngine<T>> Form<T, E> {
    /// Populate a model from the field values, then validate it
    pub fn validate(&mut self) -> Result<&OverallResult> {
        let model: T = self.fields.populate()?;
        Ok(self.validate_model(&model))
    }

    /// Populate a model and validate only the rules for the form's fields
    pub fn validate_scoped(&mut self) -> Result<&OverallResult> {
        let model: T = self.fields.populate()?;
        Ok(self.validate_model_scoped(&model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Shared, Validatable, Validity};
    use crate::rules::checks::*;
    use crate::rules::{Cascade, RuleSet};
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "PascalCase", default)]
    struct TestClass {
        from_email: Option<String>,
        to_name: Option<String>,
        message_html: Option<String>,
        rating: Option<i32>,
    }

    const SHORT_NAME: &str = "How you bout to enter a FULL 'name' with less than 3 chars!?";
    const NO_SPACE: &str = "Expecting at least first and last name separated by a space!";

    fn filled(value: &Option<String>) -> bool {
        value.as_deref().is_some_and(not_empty)
    }

    fn test_class_rules() -> RuleSet<TestClass> {
        let mut rules = RuleSet::new();
        rules
            .rule_for("FromEmail")
            .cascade(Cascade::StopOnFirstFailure)
            .must("not_empty", "'From Email' must not be empty.", |t: &TestClass| {
                filled(&t.from_email)
            })
            .must("email", "'From Email' is not a valid email address.", |t: &TestClass| {
                t.from_email.as_deref().is_some_and(is_email)
            });
        rules
            .rule_for("ToName")
            .must("not_empty", "'To Name' must not be empty.", |t: &TestClass| {
                filled(&t.to_name)
            });
        rules
            .rule_for("ToName")
            .when(|t: &TestClass| t.to_name.is_some())
            .must("min_length", SHORT_NAME, |t: &TestClass| {
                t.to_name.as_deref().is_some_and(|n| min_length(n, 3))
            })
            .must("contains", NO_SPACE, |t: &TestClass| {
                t.to_name.as_deref().is_some_and(|n| contains(n, " "))
            });
        rules
            .rule_for("MessageHtml")
            .cascade(Cascade::StopOnFirstFailure)
            .must("not_empty", "'Message Html' must not be empty.", |t: &TestClass| {
                filled(&t.message_html)
            })
            .must("min_length", "'Message Html' is too short.", |t: &TestClass| {
                t.message_html.as_deref().is_some_and(|m| min_length(m, 3))
            })
            .must("contains", "Must include DOCTYPE in HTML Message.", |t: &TestClass| {
                t.message_html.as_deref().is_some_and(|m| contains(m, "DOCTYPE"))
            });
        rules
            .rule_for("Rating")
            .cascade(Cascade::StopOnFirstFailure)
            .must("not_empty", "'Rating' must not be empty.", |t: &TestClass| {
                t.rating.is_some_and(|r| r != 0)
            })
            .must("inclusive_between", "'Rating' must be between 1 and 10.", |t: &TestClass| {
                t.rating.is_some_and(|r| in_range(r, 1, 10))
            });
        rules
    }

    struct Fixture {
        from_email: Shared<Validatable<Option<String>>>,
        to_name: Shared<Validatable<Option<String>>>,
        message_html: Shared<Validatable<Option<String>>>,
        rating: Shared<Validatable<Option<i32>>>,
        form: Form<TestClass, RuleSet<TestClass>>,
    }

    fn fixture() -> Fixture {
        let from_email = Validatable::shared("FromEmail");
        let to_name = Validatable::shared("ToName");
        let message_html = Validatable::shared("MessageHtml");
        let rating = Validatable::shared("Rating");
        let fields = Validatables::builder()
            .with(&from_email)
            .with(&to_name)
            .with(&message_html)
            .with(&rating)
            .build();
        Fixture {
            from_email,
            to_name,
            message_html,
            rating,
            form: Form::new(test_class_rules(), fields),
        }
    }

    #[test]
    fn test_single_bad_field_leaves_others_unclaimed() {
        let f = fixture();
        f.rating.borrow_mut().set_value(Some(11));
        let model = TestClass {
            rating: Some(11),
            ..Default::default()
        };

        let mut failures = f.form.engine().run_rules(&model);
        let result = crate::split::split_field(&mut failures, &mut *f.rating.borrow_mut());

        assert!(!result.is_valid_overall());
        assert_eq!(result.all_errors().len(), 4);
        assert_eq!(result.unclaimed_errors().len(), 3);
        assert!(!f.rating.borrow().is_valid());
        assert_eq!(f.rating.borrow().errors().len(), 1);
    }

    #[test]
    fn test_validate_then_clear_multiple_fields() {
        let mut f = fixture();
        f.from_email
            .borrow_mut()
            .set_value(Some("LOL_I_AM_NOT_AN_EMAIL!".to_string()));
        f.to_name.borrow_mut().set_value(Some("X".to_string()));
        f.message_html.borrow_mut().set_value(Some("NOPE".to_string()));
        f.rating.borrow_mut().set_value(Some(5));

        let result = f.form.validate().unwrap().clone();

        assert!(!result.is_valid_overall());
        assert_eq!(result.all_errors().len(), 4);
        assert!(result.is_valid_for_unclaimed());
        assert!(!f.form.fields().are_valid());
        assert_eq!(f.form.fields().errors().len(), 4);
        assert_eq!(f.from_email.borrow().errors().len(), 1);
        assert_eq!(f.to_name.borrow().errors(), [SHORT_NAME, NO_SPACE]);
        assert_eq!(f.message_html.borrow().errors().len(), 1);
        assert!(f.rating.borrow().is_valid());

        f.form.clear_validation("").unwrap();

        assert!(f.form.fields().are_valid());
        assert!(f.form.fields().errors().is_empty());
        assert_eq!(f.form.fields().first_error(), "");
        for field in f.form.fields().members() {
            let field = field.borrow();
            assert!(field.is_valid());
            assert!(field.errors().is_empty());
            assert_eq!(field.first_error(), "");
        }
        assert_eq!(f.form.result(), &OverallResult::default());
        assert_eq!(*f.rating.borrow().value(), Some(5));
    }

    #[test]
    fn test_all_good_values() {
        let mut f = fixture();
        f.from_email
            .borrow_mut()
            .set_value(Some("IamTheRe@lDeal.com".to_string()));
        f.to_name
            .borrow_mut()
            .set_value(Some("Maximus Decimus".to_string()));
        f.message_html
            .borrow_mut()
            .set_value(Some("<!DOCTYPE html> Sure!".to_string()));
        f.rating.borrow_mut().set_value(Some(5));

        let result = f.form.validate().unwrap();
        assert!(result.is_valid_overall());
        assert!(result.all_errors().is_empty());
        assert!(result.is_valid_for_unclaimed());
        assert!(f.form.fields().are_valid());
        assert_eq!(f.form.fields().first_error(), "");
    }

    #[test]
    fn test_custom_messages_in_order() {
        let f = fixture();
        f.to_name.borrow_mut().set_value(Some("XX".to_string()));
        let model = TestClass {
            to_name: Some("XX".to_string()),
            ..Default::default()
        };

        let mut failures = f.form.engine().run_rules(&model);
        let mut result = crate::split::split_field(&mut failures, &mut *f.to_name.borrow_mut());

        assert_eq!(f.to_name.borrow().errors(), [SHORT_NAME, NO_SPACE]);
        assert_eq!(f.to_name.borrow().first_error(), SHORT_NAME);

        f.to_name.borrow_mut().clear(false);
        assert!(f.to_name.borrow().is_valid());
        assert_eq!(f.to_name.borrow().first_error(), "");

        result.clear();
        assert!(result.is_valid_overall());
        assert!(result.unclaimed_errors().is_empty());
    }

    #[test]
    fn test_clear_one_field_leaves_other_failures() {
        let mut f = fixture();
        f.to_name.borrow_mut().set_value(Some("XX".to_string()));
        f.rating.borrow_mut().set_value(Some(0));

        f.form.validate().unwrap();
        assert!(!f.form.fields().are_valid());
        assert_eq!(f.form.fields().errors().len(), 5);
        assert_eq!(f.rating.borrow().errors().len(), 1);

        f.form.clear_validation("ToName").unwrap();

        assert!(f.to_name.borrow().is_valid());
        assert!(!f.rating.borrow().is_valid());
        assert_ne!(f.rating.borrow().first_error(), "");
        assert!(!f.form.fields().are_valid());
        assert_eq!(f.form.fields().errors().len(), 3);
        assert_eq!(*f.to_name.borrow().value(), Some("XX".to_string()));
    }

    #[test]
    fn test_clear_validation_with_reset() {
        let mut f = fixture();
        f.to_name.borrow_mut().set_value(Some("XX".to_string()));
        f.form.validate().unwrap();

        f.form.clear_validation("false|ToName, Rating").unwrap();
        assert_eq!(*f.to_name.borrow().value(), None);
        assert!(f.form.clear_validation("true|").is_err());
    }

    #[test]
    fn test_scoped_rules() {
        let f = fixture();
        assert_eq!(f.form.scoped_rules().len(), 5);

        let to_name = Validatable::<Option<String>>::shared("ToName");
        let only_name: Form<TestClass, _> = Form::new(
            test_class_rules(),
            Validatables::builder().with(&to_name).build(),
        );
        assert_eq!(only_name.scoped_rules().len(), 2);
    }

    #[test]
    fn test_validate_scoped_skips_other_fields() {
        let to_name = Validatable::<Option<String>>::shared("ToName");
        to_name.borrow_mut().set_value(Some("Maximus Decimus".to_string()));
        let mut form: Form<TestClass, _> = Form::new(
            test_class_rules(),
            Validatables::builder().with(&to_name).build(),
        );

        let unscoped = form.validate().unwrap().clone();
        assert!(!unscoped.is_valid_overall());
        assert!(!unscoped.is_valid_for_unclaimed());

        let scoped = form.validate_scoped().unwrap();
        assert!(scoped.is_valid_overall());
        assert!(to_name.borrow().is_valid());
    }
}
