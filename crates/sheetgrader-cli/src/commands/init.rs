//! The `sheetgrader init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("sheetgrader.toml").exists() {
        println!("sheetgrader.toml already exists, skipping.");
    } else {
        std::fs::write("sheetgrader.toml", SAMPLE_CONFIG)?;
        println!("Created sheetgrader.toml");
    }

    println!("\nNext steps:");
    println!("  1. Set num_questions in sheetgrader.toml to match your answer sheets");
    println!("  2. Run: sheetgrader validate --file keys.csv --kind keys");
    println!("  3. Run: sheetgrader score --responses responses.csv --keys keys.csv");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# sheetgrader configuration

# Number of answer columns ("1".."N") on every sheet.
num_questions = 75

# Add a "Total Points" column with the count of correct answers.
include_points = false

output_dir = "./sheetgrader-results"

# Any of: csv, json, html
output_formats = ["csv"]
"#;
