/// Build the attraction-listing prompt for a place.
///
/// The requested layout is the one [`crate::parse_places`] understands: a
/// numbered name line, one description line, then a `Type:` line.
pub fn attractions_prompt(place: &str, max_places: usize) -> String {
    format!(
        "List the top {max} tourist attractions in {place}.\n\
         Format each attraction exactly like this, with no other text:\n\
         1. <Name>\n\
         <One-sentence description>\n\
         Type: <Category, e.g. Historical, Museum, Park, Religious, Nature>\n\
         Number the attractions from 1 to {max}.",
        max = max_places,
        place = place.trim(),
    )
}
