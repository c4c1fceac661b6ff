use crate::bins::BinStore;
use recordshelf_core::{CollectionStore, Config, ImageResolver, Result};
use std::path::PathBuf;

pub struct AppState {
    pub resolver: ImageResolver,
    pub collection: CollectionStore,
    pub bins: BinStore,
    pub static_dir: PathBuf,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<Self> {
        let resolver = ImageResolver::from_config(config)?;
        let bins = BinStore::open(&config.paths.bin_store).await?;

        tracing::info!("Collection: {:?}", config.paths.collection);
        tracing::info!("Image cache: {:?}", config.paths.images_dir);

        Ok(Self {
            resolver,
            collection: CollectionStore::new(&config.paths.collection),
            bins,
            static_dir: config.paths.static_dir.clone(),
        })
    }
}
