use std::path::{Path, PathBuf};
use std::sync::Arc;

use storypack_archive::{Archiver, ZipArchiver};
use storypack_types::{is_valid_id, ExportHeader};
use tracing::info;

use crate::config::ExportConfig;
use crate::document::read_required;
use crate::error::{PipelineError, PipelineResult};

/// Unpacks exported archives. Does not rebuild any dedup state.
#[derive(Clone)]
pub struct Importer {
    config: ExportConfig,
    archiver: Arc<dyn Archiver>,
}

impl Importer {
    pub fn new(config: ExportConfig) -> Self {
        let archiver: Arc<dyn Archiver> = Arc::new(ZipArchiver::new(config.compression));
        Self { config, archiver }
    }

    pub fn with_archiver(mut self, archiver: Arc<dyn Archiver>) -> Self {
        self.archiver = archiver;
        self
    }

    /// Read and parse a header document.
    pub async fn read_header(&self, header_path: &Path) -> PipelineResult<ExportHeader> {
        let text = read_required(header_path, "header").await?;
        Ok(ExportHeader::from_json(&text)?)
    }

    /// Unpack the story archive next to `header_path` into
    /// `<destination_root>/<storyId>`, replacing existing files.
    pub async fn import_story(
        &self,
        header_path: &Path,
        destination_root: &Path,
    ) -> PipelineResult<PathBuf> {
        let header = self.read_header(header_path).await?;
        if !is_valid_id(&header.story) {
            return Err(PipelineError::InvalidHeader(format!(
                "invalid story id {:?}",
                header.story
            )));
        }

        let source_dir = header_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let archive = self.config.archive_path(&source_dir, &header.story);
        let project = destination_root.join(&header.story);

        let files = self.unpack(archive.clone(), project.clone()).await?;
        info!(
            story = %header.story,
            chapters = header.chapters.len(),
            archive = %archive.display(),
            project = %project.display(),
            files,
            "story imported"
        );
        Ok(project)
    }

    /// Unpack one chapter archive into `target_folder`, creating it if
    /// needed.
    pub async fn restore_chapter(
        &self,
        archive_path: &Path,
        target_folder: &Path,
    ) -> PipelineResult<PathBuf> {
        let files = self
            .unpack(archive_path.to_path_buf(), target_folder.to_path_buf())
            .await?;
        info!(
            archive = %archive_path.display(),
            target = %target_folder.display(),
            files,
            "chapter restored"
        );
        Ok(target_folder.to_path_buf())
    }

    async fn unpack(&self, archive: PathBuf, dest: PathBuf) -> PipelineResult<usize> {
        let archiver = Arc::clone(&self.archiver);
        let files =
            tokio::task::spawn_blocking(move || archiver.decompress(&archive, &dest, true)).await??;
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use serde_json::json;
    use storypack_types::Story;

    use crate::export::Exporter;

    fn write(root: &Path, rel: &str, data: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, data).unwrap();
    }

    fn project(root: &Path) -> Story {
        write(root, "cover.png", &[0x89, b'P', b'N', b'G', 0, 1, 2]);
        write(root, "index.json", br#"{"id":"tale","chapters":[{"id":"c1"},{"id":"c2"}]}"#);
        write(
            root,
            "blackboard.json",
            br#"{"resources":{"backgrounds":{"forest":"backgrounds/forest.png"}}}"#,
        );
        write(root, "backgrounds/forest.png", b"forest pixels");
        let flow = json!({ "blocks": [ { "commands": [
            { "kind": "show_background", "payload": { "background": "forest" } }
        ] } ] });
        write(root, "c1/flow.json", flow.to_string().as_bytes());
        write(root, "c2/assets/portrait.png", b"portrait");
        Story::new("tale", root).with_chapter("c1").with_chapter("c2")
    }

    #[tokio::test]
    async fn export_then_import_roundtrip() {
        let src = tempfile::tempdir().unwrap();
        let story = project(src.path());
        let report = Exporter::new(ExportConfig::default())
            .export_resources(&story)
            .await
            .unwrap();

        let dest = tempfile::tempdir().unwrap();
        let imported = Importer::new(ExportConfig::default())
            .import_story(&report.header_path, dest.path())
            .await
            .unwrap();
        assert_eq!(imported, dest.path().join("tale"));

        for rel in [
            "blackboard.json",
            "index.json",
            "cover.png",
            "c1/flow.json",
            "c2/assets/portrait.png",
        ] {
            assert_eq!(
                fs::read(imported.join(rel)).unwrap(),
                fs::read(src.path().join(rel)).unwrap(),
                "{rel} differs"
            );
        }
    }

    #[tokio::test]
    async fn import_clobbers_existing_files() {
        let src = tempfile::tempdir().unwrap();
        let story = project(src.path());
        let report = Exporter::new(ExportConfig::default())
            .export_resources(&story)
            .await
            .unwrap();

        let dest = tempfile::tempdir().unwrap();
        write(dest.path(), "tale/cover.png", b"old cover");
        let imported = Importer::new(ExportConfig::default())
            .import_story(&report.header_path, dest.path())
            .await
            .unwrap();
        assert_eq!(
            fs::read(imported.join("cover.png")).unwrap(),
            fs::read(src.path().join("cover.png")).unwrap()
        );
    }

    #[tokio::test]
    async fn restore_chapter_into_new_folder() {
        let src = tempfile::tempdir().unwrap();
        let story = project(src.path());
        let report = Exporter::new(ExportConfig::default())
            .export_resources(&story)
            .await
            .unwrap();

        let target = src.path().join("restored/deep/c1");
        let out = Importer::new(ExportConfig::default())
            .restore_chapter(&report.chapters[0].archive, &target)
            .await
            .unwrap();
        assert_eq!(out, target);
        assert_eq!(fs::read(target.join("backgrounds/forest.png")).unwrap(), b"forest pixels");
    }

    #[tokio::test]
    async fn missing_header() {
        let dir = tempfile::tempdir().unwrap();
        let err = Importer::new(ExportConfig::default())
            .import_story(&dir.path().join("content.elp"), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::MissingDocument { kind: "header", .. }));
    }

    #[tokio::test]
    async fn missing_story_archive() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "content.elp", br#"{"story":"tale","chapters":[]}"#);
        let err = Importer::new(ExportConfig::default())
            .import_story(&dir.path().join("content.elp"), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Archive(storypack_archive::ArchiveError::ArchiveMissing(_))
        ));
    }

    #[tokio::test]
    async fn header_with_path_like_story_id() {
        for story in ["../evil", "..", ".", ""] {
            let dir = tempfile::tempdir().unwrap();
            let header = serde_json::to_vec(&json!({ "story": story, "chapters": [] })).unwrap();
            write(dir.path(), "content.elp", &header);
            let err = Importer::new(ExportConfig::default())
                .import_story(&dir.path().join("content.elp"), dir.path())
                .await
                .unwrap_err();
            assert!(matches!(err, PipelineError::InvalidHeader(_)), "{story:?}: {err}");
        }
    }

    #[tokio::test]
    async fn restore_missing_archive() {
        let dir = tempfile::tempdir().unwrap();
        let err = Importer::new(ExportConfig::default())
            .restore_chapter(&dir.path().join("c9.zip"), &dir.path().join("out"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Archive(_)));
    }
}
