//! Main bundler orchestration.
//!
//! This module provides the [`Bundler`] orchestrator that runs collection
//! and packaging for one set of [`Settings`].

use std::sync::Arc;

use crate::bundler::{
    ArtifactSource, BinaryOutputSource, ClassifiedJarSource, DescriptorSource, NamingRules,
    Result, VariantFilter, utils::fs,
};
use crate::config::Settings;

use super::{BundledArchive, Collector, Packager};

/// Main bundler orchestrator.
///
/// Erases the staging directory, collects every artifact into it, then
/// writes the archive. The phases run strictly in sequence and the run owns
/// the staging directory for its whole duration.
///
/// # Examples
///
/// ```no_run
/// use central_portal_bundler::bundler::Bundler;
/// use central_portal_bundler::config::SettingsBuilder;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = SettingsBuilder::new()
///     .group_id("com.example")
///     .artifact_id("foo")
///     .version("1.0.0")
///     .build()?;
///
/// let archive = Bundler::new(settings).bundle().await?;
/// println!("{} ({} entries)", archive.path.display(), archive.entries.len());
/// # Ok(())
/// # }
/// ```
pub struct Bundler {
    settings: Settings,
    sources: Vec<Arc<dyn ArtifactSource>>,
}

impl std::fmt::Debug for Bundler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bundler")
            .field("settings", &self.settings)
            .field(
                "sources",
                &self.sources.iter().map(|s| s.describe()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Bundler {
    /// Creates a bundler reading the default build output locations.
    pub fn new(settings: Settings) -> Self {
        let sources = Self::default_sources(&settings);
        Self { settings, sources }
    }

    /// Replaces the artifact sources.
    pub fn with_sources(mut self, sources: Vec<Arc<dyn ArtifactSource>>) -> Self {
        self.sources = sources;
        self
    }

    /// Binary outputs, classified jars and descriptors, in that order.
    pub fn default_sources(settings: &Settings) -> Vec<Arc<dyn ArtifactSource>> {
        vec![
            Arc::new(BinaryOutputSource::new(
                settings.binary_output_dir(),
                settings.binary_extension(),
                match settings.flavor_name() {
                    Some(flavor) => VariantFilter::strict(flavor),
                    None => VariantFilter::new(settings.variant_marker()),
                },
            )),
            Arc::new(ClassifiedJarSource::new(settings.classified_jar_dir())),
            Arc::new(DescriptorSource::new(settings.descriptor_dir())),
        ]
    }

    /// Returns a reference to the bundler settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Collects and packages one bundle.
    pub async fn bundle(&self) -> Result<BundledArchive> {
        let settings = &self.settings;
        let staging_dir = settings.staging_dir();

        log::info!(
            "Bundling {} into {}",
            settings.coordinates(),
            staging_dir.display()
        );
        fs::create_dir_all(staging_dir, true).await?;

        let collector = Collector::new(
            NamingRules::new(
                settings.coordinates().clone(),
                settings.binary_extension(),
                settings.signature_fallback(),
            ),
            settings.collision_policy(),
            self.sources.clone(),
        );
        let bundle = collector.collect(staging_dir).await?;
        if bundle.is_empty() {
            log::warn!("No artifacts found; the archive will be empty");
        }

        Packager::new(settings.coordinates())
            .package(staging_dir, settings.output_archive())
            .await
    }
}
