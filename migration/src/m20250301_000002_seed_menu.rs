use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Products {
    Table,
    Name,
    Description,
    PriceCents,
    ImageUrl,
    Category,
    Available,
}

/// (name, description, price in cents, image url, category)
const DEMO_MENU: &[(&str, &str, i64, &str, &str)] = &[
    (
        "Spring Rolls",
        "Crispy vegetable rolls with sweet chili dip",
        650,
        "https://images.unsplash.com/photo-1606525437679-037aca74a3e9",
        "Starters",
    ),
    (
        "Pork Dumplings",
        "Six steamed dumplings with black vinegar",
        850,
        "https://images.unsplash.com/photo-1496116218417-1a781b1c416c",
        "Starters",
    ),
    (
        "Hot and Sour Soup",
        "Tofu, bamboo shoots and wood ear mushrooms",
        700,
        "https://images.unsplash.com/photo-1547592166-23ac45744acd",
        "Starters",
    ),
    (
        "Kung Pao Chicken",
        "Wok-fried chicken with peanuts and dried chili",
        1550,
        "https://images.unsplash.com/photo-1525755662778-989d0524087e",
        "Mains",
    ),
    (
        "Mapo Tofu",
        "Silken tofu in Sichuan chili bean sauce",
        1350,
        "https://images.unsplash.com/photo-1582452919408-aca6fb2d1b11",
        "Mains",
    ),
    (
        "Beef Chow Fun",
        "Flat rice noodles with beef and bean sprouts",
        1600,
        "https://images.unsplash.com/photo-1585032226651-759b368d7246",
        "Mains",
    ),
    (
        "Egg Fried Rice",
        "Jasmine rice, egg and spring onion",
        900,
        "https://images.unsplash.com/photo-1603133872878-684f208fb84b",
        "Sides",
    ),
    (
        "Jasmine Tea",
        "Pot of hot jasmine green tea",
        350,
        "https://images.unsplash.com/photo-1564890369478-c89ca6d9cde9",
        "Drinks",
    ),
    (
        "Lychee Soda",
        "Sparkling lychee with lime",
        450,
        "https://images.unsplash.com/photo-1551024709-8f23befc6f87",
        "Drinks",
    ),
    (
        "Mango Pudding",
        "Chilled mango pudding with evaporated milk",
        600,
        "https://images.unsplash.com/photo-1488477181946-6428a0291777",
        "Desserts",
    ),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert.into_table(Products::Table).columns([
            Products::Name,
            Products::Description,
            Products::PriceCents,
            Products::ImageUrl,
            Products::Category,
            Products::Available,
        ]);
        for (name, description, price_cents, image_url, category) in DEMO_MENU {
            insert.values_panic([
                (*name).into(),
                (*description).into(),
                (*price_cents).into(),
                (*image_url).into(),
                (*category).into(),
                true.into(),
            ]);
        }
        manager.exec_stmt(insert.to_owned()).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let names: Vec<&str> = DEMO_MENU.iter().map(|(name, ..)| *name).collect();
        let delete = Query::delete()
            .from_table(Products::Table)
            .and_where(Expr::col(Products::Name).is_in(names))
            .to_owned();
        manager.exec_stmt(delete).await?;
        Ok(())
    }
}
