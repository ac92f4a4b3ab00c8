//! Seed the merch catalog.
//!
//! Reads merch records from a YAML file (or uses the launch merch line when no
//! file is given) and inserts every record whose name is not already in the
//! catalog. Running it twice is harmless.
//!
//! # File format
//!
//! ```yaml
//! - name: Veilbound Logo Tee
//!   description: Soft cotton tee with the Veilbound sigil.
//!   price: "29.99"
//!   image_url: /static/images/merch/logo-tee.jpg
//!   colors: [Black, Bone]
//!   sizes: [S, M, L, XL]
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};

use veilbound_core::{MerchProductError, NewMerchProduct};
use veilbound_core::catalog::default_merch;
use veilbound_storefront::catalog::MerchCatalog;
use veilbound_storefront::db::{PgMerchCatalog, create_pool};

use super::{CommandError, database_url};

/// One merch record in a seed file.
#[derive(Debug, Deserialize)]
pub struct MerchSeed {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Decimal string, e.g. `"29.99"`.
    pub price: String,
    #[serde(default)]
    pub image_url: String,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
}

impl MerchSeed {
    fn validate(&self) -> Result<NewMerchProduct, CommandError> {
        let invalid = |source| CommandError::InvalidRecord {
            name: self.name.clone(),
            source,
        };
        let price = self
            .price
            .trim()
            .trim_start_matches('$')
            .parse::<Decimal>()
            .map_err(|_| invalid(MerchProductError::InvalidPrice(self.price.clone())))?;
        NewMerchProduct::new(
            &self.name,
            &self.description,
            price,
            &self.image_url,
            &self.colors,
            &self.sizes,
        )
        .map_err(invalid)
    }
}

/// Parse and validate a seed file's contents.
///
/// Every record is validated before anything is written.
///
/// # Errors
///
/// Returns the YAML error or the first invalid record.
pub fn parse_seed(content: &str) -> Result<Vec<NewMerchProduct>, CommandError> {
    let records: Vec<MerchSeed> = serde_yaml::from_str(content)?;
    records.iter().map(MerchSeed::validate).collect()
}

/// Seed merch products.
///
/// # Arguments
///
/// * `file_path` - YAML seed file; the launch merch line when `None`
/// * `dry_run` - Validate and report without writing
///
/// # Errors
///
/// Returns an error if the file cannot be read or validated, or a database
/// operation fails.
pub async fn merch(file_path: Option<&str>, dry_run: bool) -> Result<(), CommandError> {
    let products = match file_path {
        Some(file_path) => {
            info!(path = %file_path, "Loading merch from file");
            let content = tokio::fs::read_to_string(Path::new(file_path))
                .await
                .map_err(|source| CommandError::Io {
                    path: file_path.to_string(),
                    source,
                })?;
            parse_seed(&content)?
        }
        None => {
            info!("No file given; seeding the launch merch line");
            default_merch()
        }
    };

    info!(count = products.len(), "Merch records validated");
    if dry_run {
        for product in &products {
            info!(name = %product.name, price = %product.price, "Would insert");
        }
        return Ok(());
    }

    let pool = create_pool(&database_url()?)?;
    let catalog = PgMerchCatalog::new(pool);

    let mut inserted = 0_usize;
    for product in &products {
        if catalog.exists_by_name(&product.name).await? {
            warn!(name = %product.name, "Already in catalog, skipping");
            continue;
        }
        let created = catalog.create(product).await?;
        info!(id = %created.id, name = %created.name, "Inserted");
        inserted += 1;
    }

    info!(
        inserted,
        skipped = products.len() - inserted,
        "Merch seeding complete"
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed() {
        let products = parse_seed(
            r#"
- name: Veilbound Hoodie
  price: "$59.99"
  colors: [Black, " Black ", Ash]
  sizes: [M, L]
- name: Sigil Pin
  description: Enamel pin
  price: "9.50"
  colors: [Gold]
  sizes: [One Size]
"#,
        )
        .unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].price.amount(), Decimal::new(5999, 2));
        assert_eq!(products[0].colors, vec!["Black", "Ash"]);
        assert_eq!(products[1].description, "Enamel pin");
    }

    #[test]
    fn test_parse_seed_rejects_bad_record() {
        let err = parse_seed(
            r#"
- name: Free Tee
  price: "-1"
  colors: [Black]
  sizes: [M]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, CommandError::InvalidRecord { name, .. } if name == "Free Tee"));

        let err = parse_seed(
            r#"
- name: Mystery Tee
  price: "cheap"
  colors: [Black]
  sizes: [M]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, CommandError::InvalidRecord { .. }));
    }
}
