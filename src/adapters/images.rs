use crate::domain::model::ImageSettings;
use crate::domain::ports::{ImageProcessor, PageFetcher};
use crate::utils::error::Result;
use async_trait::async_trait;
use image::imageops::FilterType;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Downloads profile images and stores them as square JPEGs named after the person.
pub struct ResizingImageProcessor {
    fetcher: Arc<dyn PageFetcher>,
    settings: ImageSettings,
}

impl ResizingImageProcessor {
    pub fn new(fetcher: Arc<dyn PageFetcher>, settings: ImageSettings) -> Self {
        Self { fetcher, settings }
    }

    pub fn target_path(&self, name: &str) -> PathBuf {
        Path::new(&self.settings.dir).join(format!("{}.jpg", safe_file_stem(name)))
    }
}

#[async_trait]
impl ImageProcessor for ResizingImageProcessor {
    async fn prepare(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.settings.dir).await?;
        Ok(())
    }

    async fn process(&self, name: &str, url: &str) -> String {
        if url.is_empty() {
            return String::new();
        }

        let bytes = match self.fetcher.fetch_bytes(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Image download failed for {}: {}", name, e);
                return String::new();
            }
        };

        let path = self.target_path(name);
        let target = path.clone();
        let size = self.settings.size;

        match tokio::task::spawn_blocking(move || resize_and_save(&bytes, size, &target)).await {
            Ok(Ok(())) => {
                tracing::debug!("Saved {}x{} image for {} to {}", size, size, name, path.display());
                path.to_string_lossy().into_owned()
            }
            Ok(Err(e)) => {
                tracing::warn!("Image processing failed for {}: {}", name, e);
                String::new()
            }
            Err(e) => {
                tracing::warn!("Image task for {} did not complete: {}", name, e);
                String::new()
            }
        }
    }
}

/// Decodes any supported format, stretches to `size`×`size` and writes a JPEG.
pub fn resize_and_save(bytes: &[u8], size: u32, path: &Path) -> Result<()> {
    let decoded = image::load_from_memory(bytes)?;
    let resized = decoded.resize_exact(size, size, FilterType::CatmullRom);
    resized.to_rgb8().save_with_format(path, ImageFormat::Jpeg)?;
    Ok(())
}

/// Spaces and path-hostile characters become underscores.
pub fn safe_file_stem(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() || c.is_control() => '_',
            c => c,
        })
        .collect()
}
