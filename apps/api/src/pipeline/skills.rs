use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::RegexSet;

use crate::pipeline::normalizer::NormalizedText;

/// Curated skill vocabulary, in the spelling reported back to callers.
pub const SKILL_VOCABULARY: &[&str] = &[
    // Languages
    "Python",
    "Java",
    "JavaScript",
    "TypeScript",
    "C++",
    "C#",
    "Golang",
    "Rust",
    "Ruby",
    "PHP",
    "Scala",
    "Kotlin",
    "Swift",
    "MATLAB",
    "Solidity",
    // Data stores
    "SQL",
    "MySQL",
    "PostgreSQL",
    "MongoDB",
    "Oracle",
    "Redis",
    "Cassandra",
    // Web
    "HTML",
    "CSS",
    "React",
    "Angular",
    "Vue.js",
    "Node.js",
    "Django",
    "Flask",
    "Spring Boot",
    "Hibernate",
    ".NET",
    "ASP.NET",
    "jQuery",
    "Bootstrap",
    // Data & ML
    "Machine Learning",
    "Deep Learning",
    "NLP",
    "Natural Language Processing",
    "Computer Vision",
    "Data Analysis",
    "Data Visualization",
    "Statistics",
    "TensorFlow",
    "PyTorch",
    "Keras",
    "Scikit-learn",
    "Pandas",
    "NumPy",
    "Tableau",
    "Power BI",
    "Excel",
    "Hadoop",
    "Spark",
    "Hive",
    "Kafka",
    "ETL",
    "Informatica",
    // Infrastructure
    "Docker",
    "Kubernetes",
    "Jenkins",
    "Ansible",
    "Terraform",
    "AWS",
    "Azure",
    "GCP",
    "Linux",
    "Git",
    "Networking",
    // Process & tooling
    "Selenium",
    "JIRA",
    "Agile",
    "Scrum",
    "SAP",
    "Salesforce",
    "Blockchain",
    "AutoCAD",
    "SolidWorks",
];

/// Characters that continue a token: a keyword only matches when it is not
/// glued to one of these on either side ("Java" must not match "JavaScript").
const TOKEN_CHARS: &str = r"\p{L}\p{N}+#";

static SKILL_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    let patterns = SKILL_VOCABULARY.iter().map(|skill| {
        format!(
            r"(?:^|[^{TOKEN_CHARS}]){}(?:$|[^{TOKEN_CHARS}])",
            regex::escape(&skill.to_lowercase())
        )
    });
    RegexSet::new(patterns).expect("skill vocabulary patterns are valid")
});

/// Returns the distinct vocabulary skills mentioned in the text, matched
/// case-insensitively against the folded view.
pub fn extract_skills(text: &NormalizedText) -> BTreeSet<String> {
    if text.is_empty() {
        return BTreeSet::new();
    }
    SKILL_SET
        .matches(text.folded())
        .into_iter()
        .map(|i| SKILL_VOCABULARY[i].to_string())
        .collect()
}
