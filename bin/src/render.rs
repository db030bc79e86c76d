//! Text and JSON output of dashboard answers.

use crate::Format;
use player_impact::{Comparison, PlayerCard, PositionRanking, ProfileSet, RADAR_RANGE};
use serde::Serialize;

fn json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn number(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

/// Print the configured position profiles.
pub(crate) fn profiles(profiles: &ProfileSet, format: Format) -> anyhow::Result<()> {
    if format == Format::Json {
        return json(&profiles.iter().collect::<Vec<_>>());
    }

    println!("Position profiles ({} configured)\n", profiles.len());
    for profile in profiles.iter() {
        println!("{}:", profile.position());
        for (feature, weight) in profile.weighted_features() {
            println!("  {weight:>5.2}  {feature}");
        }
        println!();
    }
    Ok(())
}

/// Print the selectable leagues.
pub(crate) fn leagues(leagues: &[String], format: Format) -> anyhow::Result<()> {
    if format == Format::Json {
        return json(leagues);
    }
    for league in leagues {
        println!("{league}");
    }
    Ok(())
}

/// Print the players available for comparison.
pub(crate) fn players(players: &[String], format: Format) -> anyhow::Result<()> {
    if format == Format::Json {
        return json(players);
    }
    println!("{} players", players.len());
    for player in players {
        println!("  {player}");
    }
    Ok(())
}

/// Print per-position rankings.
pub(crate) fn rankings(
    league: &str,
    rankings: &[PositionRanking],
    format: Format,
) -> anyhow::Result<()> {
    if format == Format::Json {
        return json(rankings);
    }

    for ranking in rankings {
        println!("Top {} {} ({league})", ranking.players.len(), ranking.position);
        if ranking.players.is_empty() {
            println!("  no qualifying players\n");
            continue;
        }
        for (rank, card) in ranking.players.iter().enumerate() {
            println!("  {}. {}", rank + 1, headline(card));
            println!("     Impact score: {}", number(card.impact_score));
            for feature in &card.features {
                println!(
                    "     {:<34} {:>8}  z {:>6}",
                    feature.name,
                    number(feature.raw),
                    number(feature.scaled)
                );
            }
        }
        println!();
    }
    Ok(())
}

/// Print a head-to-head comparison.
pub(crate) fn comparison(comparison: &Comparison, format: Format) -> anyhow::Result<()> {
    if format == Format::Json {
        return json(comparison);
    }

    for card in [&comparison.left, &comparison.right] {
        println!("{}", card.player);
        println!("  Team: {}", card.team.as_deref().unwrap_or("n/a"));
        println!("  Age: {}", age(card));
        println!("  Position: {}", card.position);
        println!("  Impact score: {}", number(card.impact_score));
        println!(
            "  Radar (standardized, axis {} to {}):",
            RADAR_RANGE.0, RADAR_RANGE.1
        );
        for (feature, value) in card.radar() {
            println!("    {feature:<34} {value:>6.2}");
        }
        println!();
    }

    let left = &comparison.left.player;
    let right = &comparison.right.player;
    println!("{:<34} {:>14} {:>14}", "Statistic", left, right);
    for row in &comparison.rows {
        println!(
            "{:<34} {:>14} {:>14}",
            row.statistic,
            number(row.left),
            number(row.right)
        );
    }
    Ok(())
}

/// Print the empty state shown when a comparison cannot be made.
pub(crate) fn placeholder(reason: &str, format: Format) -> anyhow::Result<()> {
    if format == Format::Json {
        return json(&serde_json::json!({ "comparison": null, "reason": reason }));
    }
    println!("No comparison available: {reason}");
    Ok(())
}

fn headline(card: &PlayerCard) -> String {
    format!(
        "{} ({}, {})",
        card.player,
        card.team.as_deref().unwrap_or("n/a"),
        age(card)
    )
}

fn age(card: &PlayerCard) -> String {
    card.age
        .map_or_else(|| "n/a".to_string(), |a| format!("{}", a.trunc()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use player_impact::Position;

    fn card(age: Option<f64>) -> PlayerCard {
        PlayerCard {
            player: "Nine".to_string(),
            team: Some("Club".to_string()),
            league: Some("Serie A".to_string()),
            position: Position::Attacker,
            age,
            impact_score: Some(1.234),
            features: Vec::new(),
        }
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(number(Some(1.234)), "1.23");
        assert_eq!(number(Some(2.0)), "2.00");
        assert_eq!(number(None), "n/a");
    }

    #[test]
    fn test_headline_truncates_age() {
        assert_eq!(headline(&card(Some(24.9))), "Nine (Club, 24)");
        assert_eq!(headline(&card(None)), "Nine (Club, n/a)");
    }
}
