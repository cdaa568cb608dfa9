use sea_orm_migration::prelude::*;

mod m20260801_000001_create_identities;
mod m20260801_000002_create_one_time_codes;
mod m20260801_000003_create_session_tokens;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_identities::Migration),
            Box::new(m20260801_000002_create_one_time_codes::Migration),
            Box::new(m20260801_000003_create_session_tokens::Migration),
        ]
    }
}
