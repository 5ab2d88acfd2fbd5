use crate::suite::render::{
    check_identifiers, check_suite_name, sanitize_suite_name, RenderError, SuiteRenderer,
};
use crate::suite::{SuiteDescriptor, TestDescriptor};

const BANNER: &str =
    "    // ========================================================================\n";

const UNIT_TEMPLATE: &str = r#"    @Test
    fun test___NAME__() {
        val result = __COMPARATOR__.testFunction("__NAME__", numTests = __TRIALS__)
        println("__NAME__: ${result.passedTests}/${result.totalTests} passed (${"%.1f".format(result.passRate * 100)}%)")

        if (result.failedTests > 0) {
            println("  Failed tests:")
            result.testCases.filter { !it.passed }.forEach { testCase ->
                println("    Test #${testCase.testNumber}:")
                testCase.differences.take(__MAX_DIFFS__).forEach { diff ->
                    println("      - $diff")
                }
                if (testCase.differences.size > __MAX_DIFFS__) {
                    println("      ... and ${testCase.differences.size - __MAX_DIFFS__} more differences")
                }
            }
        }
    }
"#;

const SUMMARY_TEMPLATE: &str = r#"
    @Test
    fun testAllFunctions_Summary() {
        val allFunctions = listOf(
__FUNCTIONS__
        )

        println("=".repeat(80))
        println("__SUITE__ Differential Test - Summary")
        println("=".repeat(80))
        println("Testing ${allFunctions.size} functions...")
        println()

        val results = mutableListOf<__COMPARATOR__.FunctionTestResult>()
        var errored = 0

        allFunctions.forEach { functionName ->
            try {
                val result = __COMPARATOR__.testFunction(functionName, numTests = __TRIALS__)
                results.add(result)

                val status = if (result.passRate == 1.0) "PASS " else "FAIL "
                println("$status ${functionName.padEnd(35)} ${result.passedTests}/__TRIALS__ (${"%.0f".format(result.passRate * 100)}%)")
            } catch (e: Exception) {
                errored++
                println("ERROR ${functionName.padEnd(35)} ${e.message}")
            }
        }

        val fullyPassing = results.count { it.passRate == 1.0 }
        val partiallyPassing = results.count { it.passRate > 0.0 && it.passRate < 1.0 }
        val fullyFailing = results.count { it.passRate == 0.0 } + errored

        val totalTests = results.sumOf { it.totalTests } + errored * __TRIALS__
        val totalPassed = results.sumOf { it.passedTests }
        val overallPassRate = if (totalTests > 0) totalPassed.toDouble() / totalTests else 0.0

        println()
        println("=".repeat(80))
        println("Summary:")
        println("-".repeat(80))
        println("Functions tested: ${allFunctions.size}")
        println("  Fully passing (100%): $fullyPassing")
        println("  Partially passing: $partiallyPassing")
        println("  Fully failing (0%): $fullyFailing")
        println("  Errored: $errored")
        println()
        println("Total test cases: $totalTests")
        println("  Passed: $totalPassed")
        println("  Failed: ${totalTests - totalPassed}")
        println("  Overall pass rate: ${"%.1f".format(overallPassRate * 100)}%")
        println("=".repeat(80))
    }
}
"#;

/// Emits a JUnit test class in the layout of the Kotlin decompiler harness.
pub struct KotlinRenderer {
    package: Option<String>,
    comparator: String,
}

impl KotlinRenderer {
    pub fn new(package: Option<String>, comparator: impl Into<String>) -> Self {
        Self { package, comparator: comparator.into() }
    }

    fn render_unit(&self, test: &TestDescriptor) -> String {
        UNIT_TEMPLATE
            .replace("__COMPARATOR__", &self.comparator)
            .replace("__NAME__", &test.function_name)
            .replace("__TRIALS__", &test.trial_count.to_string())
            .replace("__MAX_DIFFS__", &test.max_reported_differences.to_string())
    }

    fn section(title: &str, note: &str) -> String {
        format!("\n{BANNER}    // {title}\n    // {note}\n{BANNER}\n")
    }
}

impl SuiteRenderer for KotlinRenderer {
    fn name(&self) -> &'static str {
        "kotlin"
    }

    fn description(&self) -> &'static str {
        "JUnit class calling a Kotlin testFunction(name, numTests) object"
    }

    fn file_extension(&self) -> &'static str {
        "kt"
    }

    fn render(&self, suite: &SuiteDescriptor) -> Result<String, RenderError> {
        check_identifiers(suite, "Kotlin")?;
        check_suite_name(&suite.suite_name)?;
        let class_name = format!("{}DifferentialTest", sanitize_suite_name(&suite.suite_name));

        let mut out = String::new();
        if let Some(package) = &self.package {
            out.push_str(&format!("package {package}\n\n"));
        }
        out.push_str("import kotlin.test.Test\n\n");
        out.push_str("/**\n");
        out.push_str(&format!(" * Differential tests for {} functions.\n", suite.suite_name));
        out.push_str(" *\n");
        out.push_str(&format!(
            " * Tests each function with {} random initial states, comparing the\n",
            suite.trial_count
        ));
        out.push_str(" * interpreter against the generated code over RAM, registers and flags.\n");
        out.push_str(" *\n");
        out.push_str(" * Generated by asm-difftest from the function inventory; do not edit.\n");
        out.push_str(&format!(
            " * Total functions tested: {} ({} leaf + {} non-leaf)\n",
            suite.test_count(),
            suite.leaf.len(),
            suite.non_leaf.len()
        ));
        out.push_str(" */\n");
        out.push_str(&format!("class {class_name} {{\n"));

        out.push_str(&Self::section(
            &format!("LEAF FUNCTIONS ({})", suite.leaf.len()),
            "These functions don't call other functions",
        ));
        let leaf_units: Vec<String> = suite.leaf.iter().map(|t| self.render_unit(t)).collect();
        out.push_str(&leaf_units.join("\n"));

        out.push_str(&Self::section(
            &format!("NON-LEAF FUNCTIONS ({})", suite.non_leaf.len()),
            "These functions call other functions",
        ));
        let non_leaf_units: Vec<String> =
            suite.non_leaf.iter().map(|t| self.render_unit(t)).collect();
        out.push_str(&non_leaf_units.join("\n"));

        out.push_str(&Self::section("Summary Test - Run All Functions", "Aggregates pass rates"));
        let functions = suite
            .aggregate
            .functions
            .iter()
            .map(|name| format!("            \"{name}\""))
            .collect::<Vec<_>>()
            .join(",\n");
        out.push_str(
            &SUMMARY_TEMPLATE
                .replace("__FUNCTIONS__", &functions)
                .replace("__SUITE__", &suite.suite_name)
                .replace("__COMPARATOR__", &self.comparator)
                .replace("__TRIALS__", &suite.aggregate.trial_count.to_string()),
        );

        Ok(out)
    }
}
