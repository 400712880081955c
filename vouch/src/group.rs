//! Test case registration.
//!
//! Declarations register [`TestCase`]s into a tree of [`ExampleGroup`]s. A
//! case's full description is the path of group descriptions above it
//! followed by its own, joined by spaces.

use std::fmt;

use crate::error::CheckResult;

/// What a test case is checking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// An expected-valid probe is accepted
    Accepts,
    /// An expected-invalid probe is rejected
    Rejects,
    /// A metadata or response property holds
    Holds,
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Expectation::Accepts => "accepts",
            Expectation::Rejects => "rejects",
            Expectation::Holds => "holds",
        };
        write!(f, "{}", name)
    }
}

/// A boxed test case procedure
pub type Procedure = Box<dyn Fn() -> CheckResult>;

/// A single registered check
pub struct TestCase {
    description: String,
    expectation: Expectation,
    procedure: Procedure,
}

impl TestCase {
    /// Create a new test case
    pub fn new<F>(description: impl Into<String>, expectation: Expectation, procedure: F) -> Self
    where
        F: Fn() -> CheckResult + 'static,
    {
        Self {
            description: description.into(),
            expectation,
            procedure: Box::new(procedure),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn expectation(&self) -> Expectation {
        self.expectation
    }

    /// Execute the procedure
    pub fn run(&self) -> CheckResult {
        (self.procedure)()
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("description", &self.description)
            .field("expectation", &self.expectation)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
enum Node {
    Case(TestCase),
    Group(ExampleGroup),
}

/// A described group of test cases and nested groups
#[derive(Debug, Default)]
pub struct ExampleGroup {
    description: String,
    nodes: Vec<Node>,
}

impl ExampleGroup {
    /// Create a new empty group
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            nodes: Vec::new(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Add a nested group built by `build`
    pub fn describe<F>(&mut self, description: impl Into<String>, build: F) -> &mut Self
    where
        F: FnOnce(&mut ExampleGroup),
    {
        let mut group = ExampleGroup::new(description);
        build(&mut group);
        self.nodes.push(Node::Group(group));
        self
    }

    /// Register a check that must hold
    pub fn it<F>(&mut self, description: impl Into<String>, procedure: F) -> &mut Self
    where
        F: Fn() -> CheckResult + 'static,
    {
        self.push(TestCase::new(description, Expectation::Holds, procedure))
    }

    /// Register a prepared test case
    pub fn push(&mut self, case: TestCase) -> &mut Self {
        self.nodes.push(Node::Case(case));
        self
    }

    /// Register several prepared test cases
    pub fn extend(&mut self, cases: impl IntoIterator<Item = TestCase>) -> &mut Self {
        self.nodes.extend(cases.into_iter().map(Node::Case));
        self
    }

    /// Append an already built group
    pub fn nest(&mut self, group: ExampleGroup) -> &mut Self {
        self.nodes.push(Node::Group(group));
        self
    }

    /// Total number of test cases, including nested groups
    pub fn len(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| match node {
                Node::Case(_) => 1,
                Node::Group(group) => group.len(),
            })
            .sum()
    }

    /// Check whether the group holds no test cases at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every test case in registration order with its full description
    pub fn cases(&self) -> Vec<(String, &TestCase)> {
        let mut out = Vec::with_capacity(self.len());
        self.collect_cases(&[], &mut out);
        out
    }

    fn collect_cases<'a>(&'a self, prefix: &[&'a str], out: &mut Vec<(String, &'a TestCase)>) {
        let mut path = prefix.to_vec();
        if !self.description.is_empty() {
            path.push(&self.description);
        }
        for node in &self.nodes {
            match node {
                Node::Case(case) => {
                    let mut parts = path.clone();
                    parts.push(case.description());
                    out.push((parts.join(" "), case));
                }
                Node::Group(group) => group.collect_cases(&path, out),
            }
        }
    }

    /// Descriptions of every test case, mostly useful in tests
    pub fn descriptions(&self) -> Vec<String> {
        self.cases().into_iter().map(|(name, _)| name).collect()
    }
}

impl AsRef<ExampleGroup> for ExampleGroup {
    fn as_ref(&self) -> &ExampleGroup {
        self
    }
}
