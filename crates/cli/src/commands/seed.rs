use storefront_db::{CatalogSeed, SeedResult, SqlCategoryRepository, SqlProductRepository};

use crate::commands::{open_migrated_pool, prepare, CommandFailure, CommandResult};

pub fn run() -> CommandResult {
    let (config, runtime) = match prepare("seed") {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = open_migrated_pool(&config).await?;
        let categories = SqlCategoryRepository::new(pool.clone());
        let products = SqlProductRepository::new(pool.clone());

        let outcome = load_and_verify(&categories, &products).await;

        pool.close().await;
        outcome
    });

    match result {
        Ok(seeded) => CommandResult::success("seed", summary(&seeded)),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

async fn load_and_verify(
    categories: &SqlCategoryRepository,
    products: &SqlProductRepository,
) -> Result<SeedResult, CommandFailure> {
    let seeded = CatalogSeed::load(categories, products)
        .await
        .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;
    let verification = CatalogSeed::verify(categories, products)
        .await
        .map_err(|error| ("seed_verification", error.to_string(), 6u8))?;

    if verification.all_present {
        Ok(seeded)
    } else {
        Err(("seed_verification", verification_failure(&verification.checks), 6u8))
    }
}

fn summary(seeded: &SeedResult) -> String {
    format!(
        "demo catalog loaded: {} categories, {} products",
        seeded.categories_seeded, seeded.products_seeded
    )
}

fn verification_failure(checks: &[(&'static str, bool)]) -> String {
    let failed =
        checks.iter().filter_map(|(check, ok)| (!ok).then_some(*check)).collect::<Vec<_>>();
    if failed.is_empty() {
        "Some seed data failed to load".to_string()
    } else {
        format!("Seed verification failed for: {}", failed.join(", "))
    }
}
