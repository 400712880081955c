//! Controller declarations.
//!
//! Every case runs the action itself, so no case depends on another having
//! run first.

use std::rc::Rc;

use crate::config::RunConfig;
use crate::error::{AssertionFailure, CheckResult, ensure};
use crate::group::ExampleGroup;
use crate::response::Response;
use crate::runner::{Runner, SuiteReport};
use crate::value::Value;

type Action<R> = Rc<dyn Fn() -> R>;

/// Declarations about the response of a controller action
pub struct ControllerGroup<R: Response> {
    group: ExampleGroup,
    act: Action<R>,
}

impl<R: Response + 'static> ControllerGroup<R> {
    /// Create a group whose cases run `act` to obtain a response
    pub fn new<F>(description: impl Into<String>, act: F) -> Self
    where
        F: Fn() -> R + 'static,
    {
        Self {
            group: ExampleGroup::new(description),
            act: Rc::new(act),
        }
    }

    pub fn group(&self) -> &ExampleGroup {
        &self.group
    }

    pub fn into_group(self) -> ExampleGroup {
        self.group
    }

    pub fn run(&self, config: &RunConfig) -> SuiteReport {
        Runner::run(&self.group, config)
    }

    fn check<F>(&mut self, description: impl Into<String>, check: F) -> &mut Self
    where
        F: Fn(&R) -> CheckResult + 'static,
    {
        let act = Rc::clone(&self.act);
        self.group.it(description, move || check(&act()));
        self
    }

    /// The action assigns a non-null value to `name`
    pub fn should_assign(&mut self, name: &str) -> &mut Self {
        let name = name.to_string();
        self.check(format!("should assign {}", name), move |response| {
            match response.assigns(&name) {
                Some(value) if !value.is_null() => Ok(()),
                _ => Err(AssertionFailure::new(format!("expected {} to be assigned", name))),
            }
        })
    }

    /// The action assigns exactly `value` to `name`
    pub fn should_assign_value(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        self.should_assign_with(name, move || value.clone())
    }

    /// The action assigns to `name` the value computed by `expected` after
    /// the action ran
    pub fn should_assign_with<F>(&mut self, name: &str, expected: F) -> &mut Self
    where
        F: Fn() -> Value + 'static,
    {
        let name = name.to_string();
        self.check(format!("should assign {}", name), move |response| {
            let expected = expected();
            let actual = response.assigns(&name).unwrap_or_default();
            ensure(actual == expected, || {
                format!("expected {} to be {}, got {}", name, expected, actual)
            })
        })
    }

    pub fn should_be_success(&mut self) -> &mut Self {
        self.check("should be a success", |response| {
            ensure(response.is_success(), || {
                format!("expected a success status, got {}", response.status())
            })
        })
    }

    pub fn should_be_forbidden(&mut self) -> &mut Self {
        self.check("should be forbidden", |response| {
            ensure(response.is_forbidden(), || {
                format!("expected status 403, got {}", response.status())
            })
        })
    }

    pub fn should_render_template(&mut self, template: &str) -> &mut Self {
        let template = template.to_string();
        self.check(
            format!("should render the {} template", template),
            move |response| {
                ensure(response.template() == Some(template.as_str()), || {
                    format!("expected {} template, rendered {:?}", template, response.template())
                })
            },
        )
    }

    pub fn should_redirect_to(&mut self, target: &str) -> &mut Self {
        let target = target.to_string();
        self.should_redirect_to_with(&format!("{:?}", target), move || target.clone())
    }

    /// The action redirects to the location computed by `target`; `label`
    /// names the target in the description
    pub fn should_redirect_to_with<F>(&mut self, label: &str, target: F) -> &mut Self
    where
        F: Fn() -> String + 'static,
    {
        self.check(format!("should redirect to {}", label), move |response| {
            let target = target();
            ensure(response.redirect_location() == Some(target.as_str()), || {
                format!(
                    "expected redirect to {:?}, got {:?}",
                    target,
                    response.redirect_location()
                )
            })
        })
    }

    /// Run `prepare` before the action and the verifier it returns against the
    /// response, e.g. to check that a collaborator was called
    pub fn should_expect_to<P, V>(&mut self, message: &str, prepare: P) -> &mut Self
    where
        P: Fn() -> V + 'static,
        V: FnOnce(&R) -> CheckResult,
    {
        let act = Rc::clone(&self.act);
        self.group.it(format!("should {}", message), move || {
            let verify = prepare();
            verify(&act())
        });
        self
    }
}

impl<R: Response> AsRef<ExampleGroup> for ControllerGroup<R> {
    fn as_ref(&self) -> &ExampleGroup {
        &self.group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Page {
        status: u16,
        template: Option<String>,
        location: Option<String>,
        user: Option<Value>,
    }

    impl Response for Page {
        fn status(&self) -> u16 {
            self.status
        }

        fn template(&self) -> Option<&str> {
            self.template.as_deref()
        }

        fn redirect_location(&self) -> Option<&str> {
            self.location.as_deref()
        }

        fn assigns(&self, name: &str) -> Option<Value> {
            match name {
                "user" => self.user.clone(),
                _ => None,
            }
        }
    }

    fn outcomes(group: &ExampleGroup) -> Vec<(String, bool)> {
        group
            .cases()
            .into_iter()
            .map(|(name, case)| (name, case.run().is_ok()))
            .collect()
    }

    #[test]
    fn test_show_action() {
        let mut show = ControllerGroup::new("GET show", || Page {
            status: 200,
            template: Some("users/show".to_string()),
            user: Some(Value::from("bob")),
            ..Page::default()
        });
        show.should_be_success()
            .should_render_template("users/show")
            .should_assign("user")
            .should_assign_value("user", "bob")
            .should_be_forbidden();

        assert_eq!(
            outcomes(show.group()),
            vec![
                ("GET show should be a success".to_string(), true),
                ("GET show should render the users/show template".to_string(), true),
                ("GET show should assign user".to_string(), true),
                ("GET show should assign user".to_string(), true),
                ("GET show should be forbidden".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_redirect_and_expectation() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut create = ControllerGroup::new("POST create", move || {
            counter.set(counter.get() + 1);
            Page {
                status: 302,
                location: Some("/users/1".to_string()),
                ..Page::default()
            }
        });
        create.should_redirect_to("/users/1").should_assign("user");
        let seen = Rc::clone(&calls);
        create.should_expect_to("call the action once", move || {
            let before = seen.get();
            let seen = Rc::clone(&seen);
            move |_: &Page| ensure(seen.get() == before + 1, || "not called".to_string())
        });

        assert_eq!(
            outcomes(create.group()),
            vec![
                ("POST create should redirect to \"/users/1\"".to_string(), true),
                ("POST create should assign user".to_string(), false),
                ("POST create should call the action once".to_string(), true),
            ]
        );
        assert_eq!(calls.get(), 3);
    }
}
