//! Example showing how to use dbforge-codegen with build.rs
//!
//! The C# sources land in OUT_DIR for a .NET project to pick up. The
//! procedure scripts are embedded here and deployed with the dbforge runtime
//! when `ARCADE_DB` holds a connection string.

use dbforge::{Database, Query, SqlServerDatabase};

const GAME_PROCEDURES: &str = include_str!(concat!(env!("OUT_DIR"), "/Sql/Game_Procedures.sql"));

#[tokio::main]
async fn main() -> dbforge::Result<()> {
    println!("dbforge-codegen build.rs example");
    println!();
    println!("Generated under {}:", env!("OUT_DIR"));
    println!("  - Poco/Game.cs, Poco/GameType.cs, Poco/Player.cs, Poco/Score.cs");
    println!("  - Orm/*.cs and Orm/EntityBase.cs");
    println!("  - Dal/GameDal.cs, ... (LoadAllFromDb, LoadSingleFromDb, InsertIntoDb, UpdateInDb, DeleteFromDb)");
    println!("  - Sql/Game_Procedures.sql, ...");

    let Ok(connection_string) = std::env::var("ARCADE_DB") else {
        println!();
        println!("Set ARCADE_DB to deploy the Game procedures.");
        return Ok(());
    };

    let db = SqlServerDatabase::new(connection_string);
    for batch in GAME_PROCEDURES.split("\nGO\n").filter(|b| !b.trim().is_empty()) {
        Query::new(batch).execute(&db).await?;
    }

    let count: i32 = Query::new("SELECT COUNT(*) FROM [dbo].[Game]").fetch_scalar(&db).await?;
    let result = db.execute(&Query::procedure("[dbo].[Game_SelectAll]")).await?;
    println!("Deployed; [dbo].[Game] has {} rows (SelectAll returned {:?})", count, result.return_value);
    Ok(())
}
