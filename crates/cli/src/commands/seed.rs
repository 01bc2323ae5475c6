//! Seed the backend with products from a YAML file.
//!
//! The file is a list of product records in the backend's field names:
//!
//! ```yaml
//! - name: Classic Oxford Shirt
//!   price: 39.99
//!   countInStock: 20
//!   sku: OX-001
//!   category: Top Wear
//!   sizes: [S, M, L]
//!   colors: [White, Blue]
//!   gender: Men
//! ```

use std::path::Path;

use bazaar_core::models::ProductInput;
use tracing::{error, info};

use super::{Credentials, sign_in};

/// Parse and check a product seed file.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or a product has no name or a
/// negative price.
pub fn parse_products(content: &str) -> Result<Vec<ProductInput>, Box<dyn std::error::Error>> {
    let products: Vec<ProductInput> = serde_yaml::from_str(content)?;

    let problems: Vec<String> = products
        .iter()
        .enumerate()
        .filter_map(|(index, product)| {
            if product.name.trim().is_empty() {
                Some(format!("product #{}: missing name", index + 1))
            } else if product.price.is_sign_negative() {
                Some(format!("{}: negative price", product.name))
            } else {
                None
            }
        })
        .collect();
    if !problems.is_empty() {
        return Err(problems.join("; ").into());
    }

    Ok(products)
}

/// Create every product in the file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the operator
/// cannot sign in. Individual create failures are logged and counted.
pub async fn products(
    operator: &Credentials,
    file_path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading products from file");
    let content = tokio::fs::read_to_string(path).await?;
    let products = parse_products(&content)?;
    info!(products = products.len(), "Parsed seed file");

    let (api, token) = sign_in(operator).await?;

    let mut created = 0usize;
    let mut failed = 0usize;
    for product in &products {
        match api.create_product(&token, product).await {
            Ok(saved) => {
                info!(id = %saved.id, name = %saved.name, "Created product");
                created += 1;
            }
            Err(e) => {
                error!(name = %product.name, error = %e, "Failed to create product");
                failed += 1;
            }
        }
    }

    info!(created, failed, "Seeding complete");
    if failed > 0 {
        return Err(format!("{failed} of {} products failed", products.len()).into());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_parses_backend_field_names() {
        let products = parse_products(
            r"
- name: Oxford Shirt
  price: 39.99
  countInStock: 20
  sizes: [S, M]
- name: Chino
  price: 45
",
        )
        .unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].price, Decimal::new(3999, 2));
        assert_eq!(products[0].count_in_stock, 20);
        assert_eq!(products[0].sizes, ["S", "M"]);
        assert!(products[1].sizes.is_empty());
    }

    #[test]
    fn test_rejects_nameless_product() {
        let err = parse_products("- name: ''\n  price: 1\n").unwrap_err();
        assert!(err.to_string().contains("missing name"));
    }
}
