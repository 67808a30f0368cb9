use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)\b\w\w+\b").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","across","after","afterwards","again","against","all","almost","alone","along",
            "already","also","although","always","am","among","amongst","amoungst","amount","an","and","another",
            "any","anyhow","anyone","anything","anyway","anywhere","are","around","as","at",
            "back","be","became","because","become","becomes","becoming","been","before","beforehand","behind",
            "being","below","beside","besides","between","beyond","bill","both","bottom","but","by",
            "call","can","cannot","cant","co","con","could","couldnt","cry",
            "de","describe","detail","do","done","down","due","during",
            "each","eg","eight","either","eleven","else","elsewhere","empty","enough","etc","even","ever","every",
            "everyone","everything","everywhere","except",
            "few","fifteen","fifty","fill","find","fire","first","five","for","former","formerly","forty","found",
            "four","from","front","full","further",
            "get","give","go",
            "had","has","hasnt","have","he","hence","her","here","hereafter","hereby","herein","hereupon","hers",
            "herself","him","himself","his","how","however","hundred",
            "i","ie","if","in","inc","indeed","interest","into","is","it","its","itself",
            "keep","last","latter","latterly","least","less","ltd",
            "made","many","may","me","meanwhile","might","mill","mine","more","moreover","most","mostly","move",
            "much","must","my","myself",
            "name","namely","neither","never","nevertheless","next","nine","no","nobody","none","noone","nor",
            "not","nothing","now","nowhere",
            "of","off","often","on","once","one","only","onto","or","other","others","otherwise","our","ours",
            "ourselves","out","over","own",
            "part","per","perhaps","please","put","rather","re",
            "same","see","seem","seemed","seeming","seems","serious","several","she","should","show","side",
            "since","sincere","six","sixty","so","some","somehow","someone","something","sometime","sometimes",
            "somewhere","still","such","system",
            "take","ten","than","that","the","their","them","themselves","then","thence","there","thereafter",
            "thereby","therefore","therein","thereupon","these","they","thick","thin","third","this","those",
            "though","three","through","throughout","thru","thus","to","together","too","top","toward","towards",
            "twelve","twenty","two",
            "un","under","until","up","upon","us",
            "very","via",
            "was","we","well","were","what","whatever","when","whence","whenever","where","whereafter","whereas",
            "whereby","wherein","whereupon","wherever","whether","which","while","whither","who","whoever","whole",
            "whom","whose","why","will","with","within","without","would",
            "yet","you","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Splits field text into index terms.
///
/// Text is NFKC-normalized and lower-cased, tokens of two or more word
/// characters are kept, and English stop words are dropped. Stemming is off
/// unless requested, so diagnostics report the surface form of each term.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer {
    pub stem: bool,
}

impl Tokenizer {
    pub fn new(stem: bool) -> Self {
        Self { stem }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = text.nfkc().collect::<String>().to_lowercase();
        let mut tokens = Vec::new();
        for mat in RE.find_iter(&normalized) {
            let token = mat.as_str();
            if is_stopword(token) {
                continue;
            }
            if self.stem {
                tokens.push(STEMMER.stem(token).to_string());
            } else {
                tokens.push(token.to_string());
            }
        }
        tokens
    }
}

/// Tokenize with the default (unstemmed) settings.
pub fn tokenize(text: &str) -> Vec<String> {
    Tokenizer::default().tokenize(text)
}
