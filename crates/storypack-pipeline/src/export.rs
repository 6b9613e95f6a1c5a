//! The export pipeline.
//!
//! Per run: `Init -> PerChapter(0..n) -> StoryFinalize -> Done`. Chapter
//! bundles are extracted concurrently, folded into the accumulator in
//! declared order, then packaged concurrently. The first failure aborts
//! the whole run; staging folders are only removed on success.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use storypack_archive::{copy_file, mirror_dir, Archiver, ZipArchiver};
use storypack_flow::{Blackboard, FlowDocument, ReferenceExtractor};
use storypack_types::{Chapter, ExportHeader, ResourceBundle, Story};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::ExportConfig;
use crate::document::{read_optional, read_required};
use crate::error::{PipelineError, PipelineResult};

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// What one chapter shipped.
#[derive(Clone, Debug, Serialize)]
pub struct ChapterReport {
    pub chapter_id: String,
    pub archive: PathBuf,
    /// Resources first shipped by this chapter.
    pub delta: ResourceBundle,
    pub files_copied: usize,
    /// Delta identifiers the blackboard has no files for.
    pub unresolved: usize,
}

/// Outcome of a successful export run.
#[derive(Clone, Debug, Serialize)]
pub struct ExportReport {
    pub story_id: String,
    pub story_archive: PathBuf,
    pub header_path: PathBuf,
    /// Exported chapters in declared order.
    pub chapters: Vec<ChapterReport>,
    /// Chapters without a flow document.
    pub skipped: Vec<String>,
    /// Every resource shipped during the run.
    pub shipped: ResourceBundle,
}

// ---------------------------------------------------------------------------
// Exporter
// ---------------------------------------------------------------------------

/// Packages a story into per-chapter and story-level archives.
#[derive(Clone)]
pub struct Exporter {
    config: ExportConfig,
    extractor: ReferenceExtractor,
    archiver: Arc<dyn Archiver>,
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("config", &self.config)
            .field("extractor", &self.extractor)
            .finish()
    }
}

/// Shared state for the concurrent packaging tasks of one run.
struct RunContext {
    story_root: PathBuf,
    export_root: PathBuf,
    blackboard: Blackboard,
    archiver: Arc<dyn Archiver>,
    config: ExportConfig,
}

impl Exporter {
    /// An exporter with the built-in resolvers and a zip archiver.
    pub fn new(config: ExportConfig) -> Self {
        let archiver: Arc<dyn Archiver> = Arc::new(ZipArchiver::new(config.compression));
        Self {
            config,
            extractor: ReferenceExtractor::default(),
            archiver,
        }
    }

    pub fn with_extractor(mut self, extractor: ReferenceExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_archiver(mut self, archiver: Arc<dyn Archiver>) -> Self {
        self.archiver = archiver;
        self
    }

    /// Run a full export of `story` into `<root>/<export_dir>`.
    ///
    /// Ids become staging folder and archive names under the export root,
    /// so they are validated before anything is created or removed.
    pub async fn export_resources(&self, story: &Story) -> PipelineResult<ExportReport> {
        story.validate(&[self.config.export_dir.as_str()])?;
        if story.chapters.iter().any(|c| c.id == story.id) {
            return Err(PipelineError::IdCollision(story.id.clone()));
        }

        let export_root = self.config.export_root(&story.root);
        tokio::fs::create_dir_all(&export_root).await?;
        info!(
            story = %story.id,
            chapters = story.chapters.len(),
            export_root = %export_root.display(),
            "export started"
        );

        let blackboard_text = read_required(
            &story.root.join(&self.config.shared_data_file),
            "blackboard",
        )
        .await?;
        let ctx = Arc::new(RunContext {
            story_root: story.root.clone(),
            export_root: export_root.clone(),
            blackboard: Blackboard::from_json(&blackboard_text)?,
            archiver: Arc::clone(&self.archiver),
            config: self.config.clone(),
        });

        let bundles = self.extract_all(&story.chapters).await?;

        // Fold in declared order: "new" means new relative to every earlier chapter.
        let mut accumulator = ResourceBundle::new();
        let mut plans = Vec::new();
        let mut skipped = Vec::new();
        for (chapter, bundle) in story.chapters.iter().zip(bundles) {
            let Some(bundle) = bundle else {
                debug!(chapter = %chapter.id, "no flow document; chapter skipped");
                skipped.push(chapter.id.clone());
                continue;
            };
            let delta = accumulator.diff_and_merge(&bundle);
            debug!(
                chapter = %chapter.id,
                referenced = bundle.len(),
                new = delta.len(),
                "chapter bundle folded"
            );
            plans.push((chapter.id.clone(), delta));
        }

        let chapters = package_chapters(&ctx, plans).await?;
        let story_archive = finalize_story(&ctx, story).await?;

        let header = ExportHeader::new(
            story.id.clone(),
            chapters.iter().map(|c| c.chapter_id.clone()).collect(),
        );
        let header_path = export_root.join(&self.config.header_file);
        tokio::fs::write(&header_path, header.to_json()?).await?;

        info!(
            story = %story.id,
            exported = chapters.len(),
            skipped = skipped.len(),
            resources = accumulator.len(),
            "export finished"
        );
        Ok(ExportReport {
            story_id: story.id.clone(),
            story_archive,
            header_path,
            chapters,
            skipped,
            shipped: accumulator,
        })
    }

    /// Extract every chapter's bundle concurrently. `None` marks a chapter
    /// without a flow document. Output order matches `chapters`.
    async fn extract_all(
        &self,
        chapters: &[Chapter],
    ) -> PipelineResult<Vec<Option<ResourceBundle>>> {
        let mut tasks = JoinSet::new();
        for (i, chapter) in chapters.iter().enumerate() {
            let flow_path = chapter.path.join(&self.config.flow_file);
            let extractor = self.extractor.clone();
            let id = chapter.id.clone();
            tasks.spawn(async move {
                let bundle = extract_chapter(&extractor, &flow_path)
                    .await
                    .map_err(|e| PipelineError::chapter(&id, e))?;
                Ok::<_, PipelineError>((i, bundle))
            });
        }

        let mut bundles = vec![None; chapters.len()];
        while let Some(joined) = tasks.join_next().await {
            let (i, bundle) = joined??;
            bundles[i] = bundle;
        }
        Ok(bundles)
    }
}

async fn extract_chapter(
    extractor: &ReferenceExtractor,
    flow_path: &Path,
) -> PipelineResult<Option<ResourceBundle>> {
    let Some(text) = read_optional(flow_path).await? else {
        return Ok(None);
    };
    let document = FlowDocument::from_json(&text)?;
    Ok(Some(extractor.extract(&document)?))
}

// ---------------------------------------------------------------------------
// Chapter packaging
// ---------------------------------------------------------------------------

async fn package_chapters(
    ctx: &Arc<RunContext>,
    plans: Vec<(String, ResourceBundle)>,
) -> PipelineResult<Vec<ChapterReport>> {
    let count = plans.len();
    let mut tasks = JoinSet::new();
    for (i, (chapter_id, delta)) in plans.into_iter().enumerate() {
        let ctx = Arc::clone(ctx);
        tasks.spawn(async move {
            let report = package_chapter(&ctx, &chapter_id, delta)
                .await
                .map_err(|e| PipelineError::chapter(&chapter_id, e))?;
            Ok::<_, PipelineError>((i, report))
        });
    }

    let mut reports: Vec<Option<ChapterReport>> = vec![None; count];
    while let Some(joined) = tasks.join_next().await {
        let (i, report) = joined??;
        reports[i] = Some(report);
    }
    Ok(reports.into_iter().flatten().collect())
}

/// Stage the files backing `delta`, zip them, and drop the staging folder.
async fn package_chapter(
    ctx: &Arc<RunContext>,
    chapter_id: &str,
    delta: ResourceBundle,
) -> PipelineResult<ChapterReport> {
    let staging = ctx.export_root.join(chapter_id);
    reset_dir(&staging).await?;

    let resolution = ctx.blackboard.resolve(&delta);
    for (category, id) in &resolution.unresolved {
        warn!(
            chapter = chapter_id,
            %category,
            id = %id,
            "resource missing from blackboard; not shipped"
        );
    }

    let mut copies = JoinSet::new();
    for file in &resolution.files {
        let rel = safe_relative(&file.path)?;
        let from = ctx.story_root.join(rel);
        let to = staging.join(rel);
        copies.spawn_blocking(move || copy_file(&from, &to));
    }
    let files_copied = resolution.files.len();
    while let Some(joined) = copies.join_next().await {
        joined??;
    }

    let archive = ctx.config.archive_path(&ctx.export_root, chapter_id);
    compress(ctx, &staging, &archive).await?;
    tokio::fs::remove_dir_all(&staging).await?;

    info!(
        chapter = chapter_id,
        new_resources = delta.len(),
        files = files_copied,
        archive = %archive.display(),
        "chapter packaged"
    );
    Ok(ChapterReport {
        chapter_id: chapter_id.to_string(),
        archive,
        delta,
        files_copied,
        unresolved: resolution.unresolved.len(),
    })
}

// ---------------------------------------------------------------------------
// Story finalize
// ---------------------------------------------------------------------------

/// Stage story-wide documents and raw chapter folders, zip them to
/// `<storyId>.<ext>`, and drop the staging folder.
async fn finalize_story(ctx: &Arc<RunContext>, story: &Story) -> PipelineResult<PathBuf> {
    let staging = ctx.export_root.join(&story.id);
    reset_dir(&staging).await?;

    let root = ctx.story_root.clone();
    let stage = staging.clone();
    let documents = [
        ctx.config.shared_data_file.clone(),
        ctx.config.index_file.clone(),
        ctx.config.cover_file.clone(),
    ];
    let chapter_ids = story.chapter_ids();
    let mirrored = tokio::task::spawn_blocking(move || -> PipelineResult<usize> {
        for name in &documents {
            copy_file(&root.join(name), &stage.join(name))?;
        }
        let mut mirrored = 0;
        for id in &chapter_ids {
            let dir = root.join(id);
            if dir.is_dir() {
                let files = mirror_dir(&dir, &stage.join(id))?;
                debug!(chapter = %id, files, "chapter folder mirrored");
                mirrored += 1;
            }
        }
        Ok(mirrored)
    })
    .await??;

    let archive = ctx.config.archive_path(&ctx.export_root, &story.id);
    compress(ctx, &staging, &archive).await?;
    tokio::fs::remove_dir_all(&staging).await?;

    info!(
        story = %story.id,
        chapter_folders = mirrored,
        archive = %archive.display(),
        "story packaged"
    );
    Ok(archive)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn compress(ctx: &Arc<RunContext>, source: &Path, archive: &Path) -> PipelineResult<usize> {
    let archiver = Arc::clone(&ctx.archiver);
    let source = source.to_path_buf();
    let archive = archive.to_path_buf();
    let files = tokio::task::spawn_blocking(move || archiver.compress(&source, &archive, false))
        .await??;
    Ok(files)
}

/// Start from an empty staging folder so leftovers of a failed run are not
/// packaged.
async fn reset_dir(dir: &Path) -> PipelineResult<()> {
    if tokio::fs::try_exists(dir).await? {
        tokio::fs::remove_dir_all(dir).await?;
    }
    tokio::fs::create_dir_all(dir).await?;
    Ok(())
}

/// Accept only plain relative paths that stay under their base.
fn safe_relative(path: &Path) -> PipelineResult<&Path> {
    let plain = path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if plain && path.components().next().is_some() {
        Ok(path)
    } else {
        Err(PipelineError::UnsafePath(path.to_path_buf()))
    }
}
