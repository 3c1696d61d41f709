use pomodesk_core::quotes::QuoteDeck;

pub fn run(meow: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut deck = if meow {
        QuoteDeck::meow()
    } else {
        QuoteDeck::standard()
    };
    let quote = deck.draw(&mut rand::thread_rng());
    println!("\"{}\" -- {}", quote.text, quote.author);
    Ok(())
}
