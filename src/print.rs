// ============================================
// src/print.rs
// Printable activity sheet
// ============================================

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::info;

use crate::activity::GeneratedActivity;
use crate::error::Result;
use crate::form::ValidatedInput;

/// Plain-text sheet ready to hand out or print.
pub fn render_sheet(
    activity: &GeneratedActivity,
    input: &ValidatedInput,
    generated_at: DateTime<Local>,
) -> String {
    let mut sheet = format!(
        "Connect Activity\n\
         ================\n\
         Year Level:   {}\n\
         Subject Area: {}\n\
         Unit Topic:   {}\n\
         \n\
         {}\n\
         \n\
         {}\n\
         \n\
         Discussion Questions\n",
        input.year_level, input.subject_area, input.unit_topic, activity.title, activity.prompt,
    );
    for (i, question) in activity.questions.iter().enumerate() {
        sheet.push_str(&format!("  {}. {}\n", i + 1, question));
    }
    sheet.push_str(&format!("\nGenerated {}\n", generated_at.format("%Y-%m-%d %H:%M")));
    sheet
}

pub fn sheet_file_name(generated_at: DateTime<Local>) -> String {
    format!("connect-activity-{}.txt", generated_at.format("%Y%m%d-%H%M%S"))
}

/// MARK: write the sheet into `dir`, creating it if needed
pub fn write_sheet(
    dir: &Path,
    activity: &GeneratedActivity,
    input: &ValidatedInput,
    generated_at: DateTime<Local>,
) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let path = dir.join(sheet_file_name(generated_at));
    fs::write(&path, render_sheet(activity, input, generated_at))?;
    info!("Printed activity sheet to {}", path.display());
    Ok(path)
}
