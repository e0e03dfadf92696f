//! CLI blackjack example.
//!
//! Progress is kept in `./.bjengine-save` and resumed on the next start.

use std::io::{self, Write};

use bjengine::storage::{FileStorage, now_ms};
use bjengine::{
    Action, Card, DealerHand, Game, GameOptions, GuestSlot, Hand, HandOutcome, Phase, Suit,
};

fn main() {
    println!("Blackjack CLI example (type 'q' to quit)");

    let now = now_ms();
    let mut game = Game::new(GameOptions::default(), now);
    let mut slot = GuestSlot::new(FileStorage::new(".bjengine-save"));

    if let Some(saved) = slot.load(now) {
        match game.restore(saved.snapshot) {
            Ok(()) => println!("Resumed saved game."),
            Err(err) => println!("Saved game discarded: {err}"),
        }
    }

    loop {
        match game.phase() {
            Phase::Betting => {
                let money = game.state().money();
                if money == 0 {
                    println!("You are out of money. Here are 500 more.");
                    game.apply(Action::AddMoney(500));
                    continue;
                }

                let Some(bet) = prompt_usize(&format!("Bet amount (1-{money}, 0 to quit): ")) else {
                    break;
                };
                if bet == 0 {
                    println!("Goodbye.");
                    break;
                }

                if let Err(err) = game.place_bet(bet) {
                    println!("Bet error: {err}");
                    if err == bjengine::BetError::ShoeExhausted {
                        game.abandon_round();
                    }
                }
            }
            Phase::Dealing => {
                game.abandon_round();
            }
            Phase::Insurance => {
                print_table(&game);
                println!("Dealer shows an Ace. Insurance offered.");
                let action = match prompt_line("Take insurance? (y/n): ").as_str() {
                    "y" | "yes" => Action::TakeInsurance,
                    _ => Action::DeclineInsurance,
                };
                game.apply(action);
            }
            Phase::Playing => {
                print_table(&game);
                println!("{}", format_actions(&game));

                let action = match prompt_line("Action: ").as_str() {
                    "h" | "hit" => Action::Hit,
                    "s" | "stand" => Action::Stand,
                    "d" | "double" => Action::Double,
                    "p" | "split" => Action::Split,
                    "q" | "quit" => break,
                    _ => {
                        println!("Unknown action.");
                        continue;
                    }
                };

                let before = game.state().clone();
                if game.apply(action) == &before {
                    println!("That action is not available.");
                }
            }
            Phase::Dealer => match game.play_dealer() {
                Ok(drawn) if !drawn.is_empty() => {
                    println!("Dealer draws {} card(s).", drawn.len());
                }
                Ok(_) => {}
                Err(err) => {
                    println!("Dealer error: {err}");
                    game.abandon_round();
                }
            },
            Phase::Finished => {
                print_table(&game);
                print_result(&game);
                game.apply(Action::ResetForNextRound);
            }
        }

        if let Err(err) = slot.save(&game.snapshot(), now_ms()) {
            println!("Could not save progress: {err}");
        }
    }

    if let Err(err) = slot.save(&game.snapshot(), now_ms()) {
        println!("Could not save progress: {err}");
    }
}

fn prompt_line(prompt: &str) -> String {
    print!("{prompt}");
    let _ = io::stdout().flush();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return String::new();
    }
    input.trim().to_lowercase()
}

fn prompt_usize(prompt: &str) -> Option<usize> {
    loop {
        let input = prompt_line(prompt);
        if input == "q" || input == "quit" {
            return None;
        }
        match input.parse::<usize>() {
            Ok(value) => return Some(value),
            Err(_) => println!("Please enter a number."),
        }
    }
}

fn print_table(game: &Game) {
    let state = game.state();
    println!("\nShoe: {} cards remaining", game.cards_remaining());

    println!(
        "\nDealer: {} (value {})",
        format_dealer(state.dealer_hand(), state.is_hole_card_hidden()),
        state.dealer_visible_score().total
    );

    let playing = state.phase() == Phase::Playing;
    for (index, hand) in state.player_hands().iter().enumerate() {
        let marker = if playing && index == state.current_hand_index() {
            "*"
        } else {
            " "
        };
        println!(
            "{} Hand {}: {} | value {} | bet {} | {:?}",
            marker,
            index,
            format_hand(hand),
            hand.value(),
            hand.bet(),
            hand.status()
        );
    }
    println!("Money: {}\n", state.money());
}

fn print_result(game: &Game) {
    let Some(result) = game.state().result() else {
        return;
    };

    for hand in &result.hands {
        let code = match hand.outcome {
            HandOutcome::Win | HandOutcome::Blackjack => "32",
            HandOutcome::Push => "33",
            HandOutcome::Lose => "31",
        };
        println!("Hand {}: {}", hand.hand_index, colorize(&hand.message, code));
    }
    if result.insurance_bet > 0 {
        println!("Insurance payout: {}", result.insurance_payout);
    }
    println!("Payout: {} (net {})", result.total_winnings, result.net);
}

fn format_actions(game: &Game) -> String {
    let parts = [
        format_action("hit", "h", true),
        format_action("stand", "s", true),
        format_action("double", "d", game.can_double()),
        format_action("split", "p", game.can_split()),
    ];
    format!("Actions: {}", parts.join(" "))
}

fn format_action(label: &str, key: &str, allowed: bool) -> String {
    let text = format!("[{key}]{label}");
    if allowed {
        colorize(&text, "32")
    } else {
        colorize(&text, "90")
    }
}

fn colorize(text: &str, code: &str) -> String {
    format!("\u{1b}[{code}m{text}\u{1b}[0m")
}

fn format_dealer(dealer: &DealerHand, hole_hidden: bool) -> String {
    if dealer.is_empty() {
        return "(no cards)".to_string();
    }

    dealer
        .cards()
        .iter()
        .enumerate()
        .map(|(index, card)| {
            if hole_hidden && index == 1 {
                "??".to_string()
            } else {
                format_card(card)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_hand(hand: &Hand) -> String {
    if hand.is_empty() {
        return "(empty)".to_string();
    }
    hand.cards()
        .iter()
        .map(format_card)
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_card(card: &Card) -> String {
    let (suit, color_code) = match card.suit {
        Suit::Hearts => ("H", "31"),
        Suit::Diamonds => ("D", "31"),
        Suit::Clubs => ("C", "32"),
        Suit::Spades => ("S", "34"),
    };

    let rank = card.rank.label();
    let colored_rank = if card.rank.value() == 10 || card.is_ace() {
        colorize(rank, color_code)
    } else {
        rank.to_string()
    };
    let colored_suit = colorize(suit, color_code);
    format!("{colored_rank}{colored_suit}")
}
