//! Built-in level listing

use anyhow::Result;

use blox_core::levels::BUILTIN;

pub async fn run(render: bool) -> Result<()> {
    println!("Built-in Levels");
    println!("===============\n");

    for level in BUILTIN {
        let grid = level.grid()?;
        println!(
            "{:<8} {}x{}  start {:?}  target {:?}",
            level.name,
            grid.rows(),
            grid.cols(),
            grid.start(),
            grid.target()
        );
        if render {
            println!("\n{}", grid.render());
        }
    }

    Ok(())
}
