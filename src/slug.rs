use rand::Rng;

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 6;

/// Derives a URL-safe slug from an article title. A random base-36 suffix keeps
/// collisions between identical titles negligible without a retry loop against
/// the unique constraint.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len() + SUFFIX_LEN + 1);
    let mut last_was_dash = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }
    if !slug.ends_with('-') && !slug.is_empty() {
        slug.push('-');
    }
    let mut rng = rand::thread_rng();
    for _ in 0..SUFFIX_LEN {
        slug.push(SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char);
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_suffix(slug: &str) -> (&str, &str) {
        slug.split_at(slug.len() - SUFFIX_LEN)
    }

    #[test]
    fn lowercases_and_dashes_title() {
        let slug = slugify("Hello World");
        let (base, suffix) = split_suffix(&slug);
        assert_eq!(base, "hello-world-");
        assert_eq!(suffix.len(), 6);
        assert!(suffix.bytes().all(|b| SUFFIX_ALPHABET.contains(&b)));
    }

    #[test]
    fn collapses_punctuation_runs() {
        let slug = slugify("How to: train -- your?? Dragon!");
        let (base, _) = split_suffix(&slug);
        assert_eq!(base, "how-to-train-your-dragon-");
    }

    #[test]
    fn same_title_gets_distinct_slugs() {
        assert_ne!(slugify("Hello World"), slugify("Hello World"));
    }

    #[test]
    fn empty_title_is_just_a_suffix() {
        let slug = slugify("!!!");
        assert_eq!(slug.len(), SUFFIX_LEN);
    }
}
