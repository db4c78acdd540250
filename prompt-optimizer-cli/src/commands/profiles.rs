//! `profiles` command

use anyhow::Result;
use comfy_table::Cell;
use prompt_optimizer_core::{TaskProfile, TaskProfileRegistry};
use serde::Serialize;

use crate::context::Context;
use crate::output::{print_field, print_list_field, print_section, TableDisplay};

pub async fn execute(ctx: &Context) -> Result<()> {
    let profiles: Vec<ProfileDisplay> = TaskProfileRegistry::all().iter().map(Into::into).collect();
    ctx.output.write_list(
        &profiles,
        &["Category", "Name", "Optimal words", "Code block", "Keywords"],
    )
}

#[derive(Debug, Serialize)]
struct ProfileDisplay {
    category: String,
    display_name: String,
    min_words: usize,
    max_words: usize,
    requires_code_block: bool,
    keywords: Vec<String>,
}

impl From<&TaskProfile> for ProfileDisplay {
    fn from(profile: &TaskProfile) -> Self {
        Self {
            category: profile.category.as_str().to_string(),
            display_name: profile.category.display_name().to_string(),
            min_words: profile.min_words(),
            max_words: profile.max_words(),
            requires_code_block: profile.requires_code_block,
            keywords: profile.keywords.iter().cloned().collect(),
        }
    }
}

impl TableDisplay for ProfileDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(&self.category),
            Cell::new(&self.display_name),
            Cell::new(format!("{}-{}", self.min_words, self.max_words)),
            Cell::new(if self.requires_code_block { "yes" } else { "no" }),
            Cell::new(self.keywords.join(", ")),
        ]
    }

    fn display_single(&self) {
        print_section(&self.display_name);
        print_field("Category", &self.category);
        print_field("Optimal words", &format!("{}-{}", self.min_words, self.max_words));
        print_list_field("Keywords", &self.keywords);
    }
}
