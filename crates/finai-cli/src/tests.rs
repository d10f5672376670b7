use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["finai-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_migrate_command() {
    let cli = Cli::try_parse_from(["finai-cli", "migrate"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Migrate)));
}

#[test]
fn sentiment_defaults_to_ensemble_without_entities() {
    let cli = Cli::try_parse_from(["finai-cli", "sentiment", "profits rose"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Sentiment {
            ref text,
            model: ModelSelector::Ensemble,
            entities: false,
        }) if text == "profits rose"
    ));
}

#[test]
fn sentiment_accepts_model_and_entities() {
    let cli = Cli::try_parse_from([
        "finai-cli",
        "sentiment",
        "profits rose",
        "--model",
        "vader",
        "--entities",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Sentiment {
            model: ModelSelector::Vader,
            entities: true,
            ..
        })
    ));
}

#[test]
fn sentiment_rejects_unknown_model() {
    assert!(Cli::try_parse_from(["finai-cli", "sentiment", "x", "--model", "gpt"]).is_err());
}

#[test]
fn recommend_defaults_limit_to_ten() {
    let cli = Cli::try_parse_from(["finai-cli", "recommend", "42"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Recommend {
            user_id: 42,
            limit: 10,
            language: None,
        })
    ));
}

#[test]
fn recommend_with_language() {
    let cli = Cli::try_parse_from(["finai-cli", "recommend", "42", "--limit", "5", "--language", "en"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Recommend {
            limit: 5,
            language: Some(ref l),
            ..
        }) if l == "en"
    ));
}

#[test]
fn parses_feedback_with_rating() {
    let cli = Cli::try_parse_from([
        "finai-cli",
        "feedback",
        "42",
        "course-1",
        "complete",
        "--rating",
        "4.5",
    ])
    .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Feedback {
            user_id,
            item_id,
            feedback_type,
            rating,
        }) => {
            assert_eq!(user_id, 42);
            assert_eq!(item_id, "course-1");
            assert_eq!(feedback_type, FeedbackType::Complete);
            assert_eq!(rating, Some(4.5));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn feedback_rejects_unknown_type() {
    assert!(Cli::try_parse_from(["finai-cli", "feedback", "1", "c", "share"]).is_err());
}
