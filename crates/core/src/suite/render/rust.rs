use crate::suite::render::{check_identifiers, check_suite_name, RenderError, SuiteRenderer};
use crate::suite::{SuiteDescriptor, TestDescriptor};

const RULE: &str =
    "// ---------------------------------------------------------------------------\n";

/// Emits a Rust integration-test file driven by `difftest_core::harness`.
pub struct RustRenderer {
    comparator_path: String,
}

impl RustRenderer {
    pub fn new(comparator_path: impl Into<String>) -> Self {
        Self { comparator_path: comparator_path.into() }
    }

    fn render_unit(&self, out: &mut String, test: &TestDescriptor) {
        out.push_str("#[test]\n");
        out.push_str(&format!("fn test_{}() {{\n", test.function_name));
        out.push_str(&format!(
            "    harness::run_function(&{}(), \"{}\", {}, {});\n",
            self.comparator_path, test.function_name, test.trial_count, test.max_reported_differences
        ));
        out.push_str("}\n\n");
    }
}

impl SuiteRenderer for RustRenderer {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn description(&self) -> &'static str {
        "Rust integration tests calling difftest_core::harness"
    }

    fn file_extension(&self) -> &'static str {
        "rs"
    }

    fn render(&self, suite: &SuiteDescriptor) -> Result<String, RenderError> {
        check_identifiers(suite, "Rust")?;
        check_suite_name(&suite.suite_name)?;

        let mut out = String::new();
        out.push_str(&format!("//! Differential tests for {} functions.\n", suite.suite_name));
        out.push_str("//!\n");
        out.push_str(&format!(
            "//! Each test runs {} randomized initial states through both execution paths\n",
            suite.trial_count
        ));
        out.push_str("//! and compares the full observable machine state.\n");
        out.push_str("//!\n");
        out.push_str("//! Generated by asm-difftest from the function inventory; do not edit.\n");
        out.push_str(&format!(
            "//! Total functions tested: {} ({} leaf + {} non-leaf)\n\n",
            suite.test_count(),
            suite.leaf.len(),
            suite.non_leaf.len()
        ));
        out.push_str("#![allow(non_snake_case)]\n\n");
        out.push_str("use difftest_core::harness;\n\n");

        out.push_str(RULE);
        out.push_str(&format!("// Leaf functions ({})\n", suite.leaf.len()));
        out.push_str(RULE);
        out.push('\n');
        for test in &suite.leaf {
            self.render_unit(&mut out, test);
        }

        out.push_str(RULE);
        out.push_str(&format!("// Non-leaf functions ({})\n", suite.non_leaf.len()));
        out.push_str(RULE);
        out.push('\n');
        for test in &suite.non_leaf {
            self.render_unit(&mut out, test);
        }

        out.push_str(RULE);
        out.push_str("// Summary: run all functions\n");
        out.push_str(RULE);
        out.push('\n');
        out.push_str("#[test]\n");
        out.push_str("fn all_functions_summary() {\n");
        out.push_str("    const FUNCTIONS: &[&str] = &[\n");
        for name in &suite.aggregate.functions {
            out.push_str(&format!("        \"{}\",\n", name));
        }
        out.push_str("    ];\n\n");
        out.push_str(&format!(
            "    let summary = harness::run_aggregate(FUNCTIONS, {}, &{}());\n",
            suite.aggregate.trial_count, self.comparator_path
        ));
        out.push_str(&format!(
            "    println!(\"{{}}\", summary.render_text({:?}));\n",
            suite.suite_name
        ));
        out.push_str("}\n");

        Ok(out)
    }
}
