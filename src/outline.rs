use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use crate::course::{assign_serial_ids, Chapter, ChapterId, Course, CourseId, Item, ItemId, ItemType};
use crate::ruleset::Ruleset;

#[derive(Serialize, Debug)]
struct CourseOutline<'a> {
    id: CourseId,
    name: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'a str,
    chapters: Vec<ChapterOutline<'a>>,
}

#[derive(Serialize, Debug)]
struct ChapterOutline<'a> {
    id: ChapterId,
    slug: String,
    name: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    icon: &'a str,
    items: Vec<ItemOutline>,
}

#[derive(Serialize, Debug)]
struct ItemOutline {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<ItemId>,
    serial: String,
    #[serde(rename = "type")]
    item_type: ItemType,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    ruleset: Option<Ruleset>,
}

impl ItemOutline {
    fn new(item: &Item) -> Self {
        Self {
            id: item.id,
            serial: item
                .ui_serial_id
                .map(|s| s.to_string())
                .unwrap_or_default(),
            item_type: item.item_type,
            name: item.name.clone(),
            ruleset: match item.item_type {
                ItemType::Activity => Some(item.ruleset()),
                ItemType::Lesson => None,
            },
        }
    }
}

const COURSE_FILE_STEM: &str = "course";

/// Unique, url-safe file names for the chapters, in course order. None of
/// them clashes with the course file.
pub fn chapter_slugs(chapters: &[Chapter]) -> Vec<String> {
    let mut slugger = github_slugger::Slugger::default();
    slugger.slug(COURSE_FILE_STEM);

    chapters
        .iter()
        .map(|chapter| {
            if github_slugger::slug(&chapter.name).is_empty() {
                slugger.slug(&format!("chapter-{}", chapter.id))
            } else {
                slugger.slug(&chapter.name)
            }
        })
        .collect()
}

fn outline(course: &Course) -> CourseOutline<'_> {
    let slugs = chapter_slugs(&course.chapters);
    let chapters = course
        .chapters
        .iter()
        .zip(slugs)
        .map(|(chapter, slug)| {
            let mut items = chapter.items.clone();
            assign_serial_ids(&mut items);

            ChapterOutline {
                id: chapter.id,
                slug,
                name: &chapter.name,
                description: &chapter.description,
                icon: &chapter.icon,
                items: items.iter().map(ItemOutline::new).collect(),
            }
        })
        .collect();

    CourseOutline {
        id: course.id,
        name: &course.name,
        description: &course.description,
        chapters,
    }
}

pub fn serialize_outline(course: &Course) -> anyhow::Result<String> {
    serde_yaml_ng::to_string(&outline(course)).context("failed to serialize course outline")
}

/// Writes `course.yaml` plus one `<chapter-slug>.yaml` per chapter into
/// `output_dir`, which must not already contain them.
pub fn write_outline(course: &Course, output_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir).context(format!(
        "failed to create output directory {}",
        output_dir.display()
    ))?;

    let outline = outline(course);
    let mut written = Vec::with_capacity(outline.chapters.len() + 1);

    let course_path = output_dir.join(format!("{}.yaml", COURSE_FILE_STEM));
    let content =
        serde_yaml_ng::to_string(&outline).context("failed to serialize course outline")?;
    create_file(&course_path, &content)?;
    written.push(course_path);

    for chapter in &outline.chapters {
        let path = output_dir.join(format!("{}.yaml", chapter.slug));
        let content = serde_yaml_ng::to_string(chapter)
            .context(format!("failed to serialize chapter {}", chapter.slug))?;
        create_file(&path, &content)?;
        written.push(path);
    }

    Ok(written)
}

fn create_file(path: &Path, content: &str) -> anyhow::Result<()> {
    let mut file = OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(path)
        .context(format!("failed to open file for {}", path.display()))?;
    write!(file, "{}", content).context(format!("failed to write {}", path.display()))?;
    Ok(())
}
