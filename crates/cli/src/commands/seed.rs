//! Seed the catalog and default settings.
//!
//! Re-running is safe: products are skipped by name and settings by key, so
//! values edited in the admin panel are never overwritten.
//!
//! # Usage
//!
//! ```bash
//! sentra-cli seed
//! ```

use sentra_core::{ProductType, Rupiah};
use sentra_server::db::{ProductRepository, RepositoryError, SettingsRepository};
use sentra_server::models::{ProductInput, setting_keys as keys};
use thiserror::Error;

use super::{ConnectError, connect};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),
}

struct Bundle {
    name: &'static str,
    price: i64,
    description: &'static str,
    items: &'static [&'static str],
    sort_order: i32,
}

const BUNDLES: &[Bundle] = &[
    Bundle {
        name: "Paket A",
        price: 50_000,
        description: "Paket hemat kebutuhan harian",
        items: &[
            "KORNET KU SACHET 50 G",
            "INDOMIE GORENG",
            "INDOMIE AYAM BAWANG",
            "SABUN MANDI GIV 400 ml",
            "GULA PASIR 1/4",
        ],
        sort_order: 1,
    },
    Bundle {
        name: "Paket B",
        price: 55_000,
        description: "Paket hemat kebutuhan dapur",
        items: &[
            "MINYAK GORENG 1L SEDAAP",
            "TISSU PASEO 500+40 SHEET",
            "KECAP BANGO MANIS 189G",
        ],
        sort_order: 2,
    },
    Bundle {
        name: "Paket C",
        price: 60_000,
        description: "Paket lengkap mingguan",
        items: &[
            "INDOMIE AYAM BAWANG",
            "TUNAS KOPI GULA AREN",
            "GENTLE GEN BOTOL 700 ML",
            "ULTRA MILK 1L",
            "INDOMIE GORENG",
        ],
        sort_order: 3,
    },
];

/// (name, price, sort order)
const UNITS: &[(&str, i64, i32)] = &[
    ("ROKOK CLASMILD 20 BTG", 28_000, 10),
    ("ROKOK JAZZY POPPIN", 18_000, 11),
    ("ROKOK MARLBORO MERAH", 35_000, 12),
    ("ROKOK 76 APEL", 15_000, 13),
    ("ROKOK 76 MANGGA", 15_000, 14),
    ("ROKOK CLASMILD PURPLE", 28_000, 15),
    ("ROKOK GARFIT", 20_000, 16),
    ("ROKOK SIGNATURE FILTER", 22_000, 17),
    ("ROKOK SAMPOERNA KRETEK", 24_000, 18),
    ("ROKOK ESSE BERRY POP", 25_000, 19),
    ("ROKOK CAMEL BIRU", 30_000, 20),
    ("ROKOK SAMPOERNA MILD", 30_000, 21),
];

const DEFAULT_SETTINGS: &[(&str, &str)] = &[
    (keys::STORE_NAME, "Swasembada-DK"),
    (keys::STORE_PHONE, "628xxxxxxxxxx"),
    (
        keys::PAYMENT_INFO,
        "Transfer ke BCA 1234567890 a.n. Swasembada-DK",
    ),
    (keys::EVOLUTION_API_URL, ""),
    (keys::EVOLUTION_API_KEY, ""),
    (keys::EVOLUTION_INSTANCE, ""),
];

fn catalog() -> Vec<ProductInput> {
    let bundles = BUNDLES.iter().map(|b| ProductInput {
        name: b.name.to_owned(),
        product_type: ProductType::Paket,
        price: Rupiah::new(b.price),
        description: Some(b.description.to_owned()),
        image: None,
        items: Some(b.items.iter().map(|&i| i.to_owned()).collect()),
        is_active: Some(true),
        sort_order: b.sort_order,
    });

    let units = UNITS.iter().map(|&(name, price, sort_order)| ProductInput {
        name: name.to_owned(),
        product_type: ProductType::Satuan,
        price: Rupiah::new(price),
        description: Some(format!("Rokok satuan - {name}")),
        image: None,
        items: None,
        is_active: Some(true),
        sort_order,
    });

    bundles.chain(units).collect()
}

/// Insert the default products and settings that are not present yet.
pub async fn run() -> Result<(), SeedError> {
    let pool = connect().await?;
    let products = ProductRepository::new(&pool);
    let settings = SettingsRepository::new(&pool);

    tracing::info!("Seeding database...");

    for product in catalog() {
        if products.exists_by_name(&product.name).await? {
            tracing::info!(name = %product.name, "Product exists, skipping");
            continue;
        }
        products.create(&product).await?;
        tracing::info!(name = %product.name, "Inserted product");
    }

    for &(key, value) in DEFAULT_SETTINGS {
        if settings.insert_if_absent(key, value).await? {
            tracing::info!(key, "Inserted setting");
        } else {
            tracing::info!(key, "Setting exists, skipping");
        }
    }

    tracing::info!("Seeding complete!");
    Ok(())
}
