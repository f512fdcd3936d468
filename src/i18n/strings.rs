use crate::i18n::catalog::{sections, Catalog, LanguageBundle, Section};
use crate::i18n::Language;

/// All localized site text for a language.
///
/// Strings are plain text. They are only ever written into the page through
/// text assignment, so no escaping is applied here.
#[derive(Debug, Clone)]
pub struct SiteStrings {
    // ==================== Navigation Bar ====================
    /// Primary navigation labels, in the order the links appear in the navbar
    pub navigation: [&'static str; 7],

    /// Footer country line
    pub footer_country: &'static str,

    // ==================== Home Page ====================
    /// Biography paragraphs on the home page
    pub biography: [&'static str; 3],

    // ==================== Page Titles ====================
    /// Page heading, keyed by page slug (file name without extension)
    pub titles: &'static [(&'static str, &'static str)],

    // ==================== Exhibitions Page ====================
    /// Exhibition tab labels, in tab order
    pub exhibitions: &'static [&'static str],

    // ==================== Museums Page ====================
    /// Museum location names keyed by `data-museum-id`.
    /// Empty for the default language: the markup itself is the source text.
    pub museum_locations: &'static [(&'static str, &'static str)],
}

impl SiteStrings {
    /// Convert into a catalog bundle.
    pub fn to_bundle(&self) -> LanguageBundle {
        let bundle = LanguageBundle::new()
            .with_section(sections::NAVIGATION, ordered(&self.navigation))
            .with_section(sections::BIOGRAPHY, ordered(&self.biography))
            .with_section(sections::TITLES, keyed(self.titles))
            .with_section(
                sections::FOOTER,
                keyed(&[("country", self.footer_country)]),
            )
            .with_section(sections::EXHIBITIONS, ordered(self.exhibitions));

        if self.museum_locations.is_empty() {
            bundle
        } else {
            bundle.with_section(sections::MUSEUM_LOCATIONS, keyed(self.museum_locations))
        }
    }
}

fn ordered(items: &[&str]) -> Section {
    Section::Ordered(items.iter().map(|s| s.to_string()).collect())
}

fn keyed(entries: &[(&str, &str)]) -> Section {
    Section::Keyed(
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

/// Strings for a language.
pub fn strings_for(language: Language) -> &'static SiteStrings {
    match language {
        Language::Italian => &ITALIAN_STRINGS,
        Language::English => &ENGLISH_STRINGS,
    }
}

/// The catalog compiled into the binary.
pub fn builtin_catalog() -> Catalog {
    Catalog::new(
        Language::all()
            .iter()
            .map(|&language| (language, strings_for(language).to_bundle())),
    )
}

// ==================== Italian Strings ====================

/// Italian strings (default language, matches the page markup)
pub const ITALIAN_STRINGS: SiteStrings = SiteStrings {
    navigation: [
        "Opere",
        "Musei",
        "Esposizioni",
        "Rassegna Stampa",
        "Collaborazioni",
        "Pubblicazioni",
        "Cataloghi",
    ],
    footer_country: "Italia",

    biography: [
        "Giorgio Vigna è un artista che esplora i confini tra realtà e immaginazione attraverso sculture, gioielli, installazioni e lavori su carta. La sua ricerca è una costante indagine sulla trasformazione della materia, in cui gli elementi primari della natura – terra, acqua, fuoco, aria – vengono esplorati e trasfigurati fino a rivelarne possibilità nascoste.",
        "Utilizza materiali diversi – vetro, metallo, carta, inchiostro – sperimentandone i limiti e trasformandoli in forme inedite: paesaggi fluidi negli acquatipi su carta, solidificazioni immaginarie del vetro, sculture che evocano geodi e minerali, gioielli che diventano vere e proprie sculture da indossare. In ciascun ambito mantiene una cifra rigorosa e coerente, in cui opposti come micro e macro, solido e liquido, povero e prezioso, memoria e invenzione si incontrano e si illuminano reciprocamente.",
        "Per Vigna fare arte significa attraversare confini, sperimentare oltre il noto, usare la materia come strumento per dare forma a un'essenza primordiale e simbolica, capace di raccontare l'origine e il centro stesso della vita.",
    ],

    titles: &[
        ("biografia", "Biografia"),
        ("opere", "Opere"),
        ("musei", "Musei"),
        ("esposizioni", "Esposizioni"),
        ("rassegna-stampa", "Rassegna Stampa"),
        ("collaborazioni", "Collaborazioni"),
        ("pubblicazioni", "Pubblicazioni"),
        ("cataloghi", "Cataloghi"),
    ],

    exhibitions: &["Mostre personali", "Mostre collettive"],

    museum_locations: &[],
};

// ==================== English Strings ====================

/// English strings
pub const ENGLISH_STRINGS: SiteStrings = SiteStrings {
    navigation: [
        "Works",
        "Museums",
        "Exhibitions",
        "Press Review",
        "Collaborations",
        "Publications",
        "Catalogues",
    ],
    footer_country: "Italy",

    biography: [
        "Giorgio Vigna is an artist who explores the boundaries between reality and imagination through sculptures, jewelry, installations and works on paper. His research is a constant investigation into the transformation of matter, in which the primary elements of nature – earth, water, fire, air – are explored and transfigured to reveal hidden possibilities.",
        "He uses different materials – glass, metal, paper, ink – experimenting with their limits and transforming them into unprecedented forms: fluid landscapes in watercolors on paper, imaginary solidifications of glass, sculptures that evoke geodes and minerals, jewelry that becomes true sculptures to wear. In each field he maintains a rigorous and coherent style, in which opposites such as micro and macro, solid and liquid, poor and precious, memory and invention meet and illuminate each other.",
        "For Vigna, making art means crossing boundaries, experimenting beyond the known, using matter as an instrument to give form to a primordial and symbolic essence, capable of telling the origin and the very center of life.",
    ],

    titles: &[
        ("biografia", "Biography"),
        ("opere", "Works"),
        ("musei", "Museums"),
        ("esposizioni", "Exhibitions"),
        ("rassegna-stampa", "Press Review"),
        ("collaborazioni", "Collaborations"),
        ("pubblicazioni", "Publications"),
        ("cataloghi", "Catalogues"),
    ],

    exhibitions: &["Solo exhibitions", "Group exhibitions"],

    museum_locations: &[
        ("mad-new-york", "Museum of Arts and Design, New York"),
        ("mad-paris", "Museum of Decorative Arts, Paris"),
        ("vam-london", "Victoria and Albert Museum, London"),
        ("cooper-hewitt", "Cooper Hewitt, Smithsonian Design Museum, New York"),
        ("corning", "Corning Museum of Glass, Corning"),
        ("museo-vetro-murano", "Glass Museum, Murano"),
        ("pforzheim", "Jewellery Museum, Pforzheim"),
    ],
};
