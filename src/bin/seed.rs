use storefront_api::{
    config::database_url_from_env,
    db::{DbPool, create_pool, run_migrations},
    services::auth_service::hash_password,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = database_url_from_env()?;

    let pool = create_pool(&database_url, 2).await?;
    run_migrations(&pool).await?;

    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".into());
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into());

    let admin_id = ensure_admin(&pool, &email, &password).await?;
    seed_products(&pool).await?;
    seed_coupons(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

async fn ensure_admin(pool: &DbPool, email: &str, password: &str) -> anyhow::Result<Uuid> {
    let email = email.trim().to_lowercase();
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO admins (id, email, password_hash)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO UPDATE SET password_hash = EXCLUDED.password_hash
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email.as_str())
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    println!("Ensured admin {email}");
    Ok(id)
}

async fn seed_products(pool: &DbPool) -> anyhow::Result<()> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        println!("Products already present, skipping");
        return Ok(());
    }

    let products = [
        ("Distracted Boyfriend Tee", 799.0, 10.0, "t-shirts", "The classic, now in cotton."),
        ("This Is Fine Tee", 699.0, 0.0, "t-shirts", "Everything is fine."),
        ("Stonks Hoodie", 1499.0, 20.0, "hoodies", "Only goes up."),
        ("Doge Mug", 349.0, 5.0, "mugs", "Such coffee. Very wow."),
    ];

    for (name, price, discount, category, description) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, price, discount, image, description, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(price)
        .bind(discount)
        .bind(format!("https://placehold.co/400x400?text={}", name.replace(' ', "+")))
        .bind(description)
        .bind(category)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}

async fn seed_coupons(pool: &DbPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO coupons (code, discount)
        VALUES ($1, $2)
        ON CONFLICT (code) DO NOTHING
        "#,
    )
    .bind("WELCOME10")
    .bind(10.0_f64)
    .execute(pool)
    .await?;

    println!("Seeded coupons");
    Ok(())
}
