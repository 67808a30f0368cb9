use reelmatch_core::tokenizer::{tokenize, Tokenizer};

#[test]
fn it_normalizes_and_optionally_stems() {
    let words = Tokenizer::new(true).tokenize("Running Runners RUN! The café's menu.");
    assert!(words.contains(&"run".to_string()));
    // NFKC keeps the composed accent; lower-casing still applies
    assert!(tokenize("CAFÉ").contains(&"café".to_string()));
}

#[test]
fn it_filters_stopwords_and_short_tokens() {
    let words = tokenize("The quick brown fox and the lazy dog, x y z");
    assert_eq!(words, vec!["quick", "brown", "fox", "lazy", "dog"]);
}
