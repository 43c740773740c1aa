use crate::types::PhonemeSequence;

/// Split a raw transcription into phoneme tokens.
///
/// Tokens are whitespace-delimited, compared byte-exact downstream: no case
/// folding and no stress or diacritic stripping happens here. `None`, empty
/// and whitespace-only input all produce an empty sequence.
pub fn tokenize_phonemes(transcription: Option<&str>) -> PhonemeSequence {
    let Some(text) = transcription else {
        return PhonemeSequence::default();
    };
    PhonemeSequence::new(text.split_whitespace().map(str::to_string).collect())
}
