//! Rule-based field classifier.
//!
//! Maps a field label (plus optional section context) to a canned Finnish
//! explanation. Used whenever the generative model is unavailable or fails,
//! and as a deterministic stand-in for the model in tests.
//!
//! Rules are checked in [`RULES`] order and the first rule with any keyword
//! contained in the lowercased haystack wins. Keyword sets overlap (for
//! example "email address" hits both address and email), so the order is part
//! of the contract. The last rule has no keywords and always matches.

use formdesk_common::FieldExplanation;

/// Field taxonomy, in rule order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldCategory {
    IdentityNumber,
    FirstName,
    LastName,
    Address,
    PostalCode,
    Phone,
    Email,
    BankAccount,
    Date,
    Amount,
    Choice,
    Generic,
}

impl FieldCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldCategory::IdentityNumber => "identity_number",
            FieldCategory::FirstName      => "first_name",
            FieldCategory::LastName       => "last_name",
            FieldCategory::Address        => "address",
            FieldCategory::PostalCode     => "postal_code",
            FieldCategory::Phone          => "phone",
            FieldCategory::Email          => "email",
            FieldCategory::BankAccount    => "bank_account",
            FieldCategory::Date           => "date",
            FieldCategory::Amount         => "amount",
            FieldCategory::Choice         => "choice",
            FieldCategory::Generic        => "generic",
        }
    }
}

/// Response text attached to a rule.
#[derive(Debug, Clone, Copy)]
pub enum Template {
    /// Fixed text, independent of the label.
    Canned {
        explanation: &'static str,
        action: &'static str,
        example: &'static str,
        tips: &'static str,
    },
    /// Catch-all boilerplate that names the field.
    Generic,
}

impl Template {
    pub fn render(&self, label: &str) -> FieldExplanation {
        match *self {
            Template::Canned { explanation, action, example, tips } => {
                FieldExplanation::new(explanation, action, example, tips)
            }
            Template::Generic => {
                let name = if label.is_empty() { "Kenttä" } else { label };
                FieldExplanation::new(
                    format!("{name} on lomakkeen kenttä. Täytä pyydetty tieto selkeästi."),
                    "Täytä kenttä täsmälleen lomakkeen ohjeiden mukaisesti. Käytä virallista kirjoitusasua ja numeroita.",
                    "Esimerkki tähän kenttään sopivasta syötteestä.",
                    "Jos et ole varma, katso lomakkeen täyttöohjetta tai kysy lomakkeen antaneelta viranomaiselta.",
                )
            }
        }
    }
}

/// Keyword trigger plus template. An empty keyword list always matches.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub category: FieldCategory,
    /// Lowercase substrings in any of the supported form languages.
    pub keywords: &'static [&'static str],
    pub template: Template,
}

impl ClassificationRule {
    pub fn matches(&self, haystack: &str) -> bool {
        self.keywords.is_empty() || self.keywords.iter().any(|k| haystack.contains(k))
    }
}

pub static RULES: &[ClassificationRule] = &[
    ClassificationRule {
        category: FieldCategory::IdentityNumber,
        keywords: &["henkilötunnus", "personnummer", "social security", "ssn"],
        template: Template::Canned {
            explanation: "Anna henkilötunnus muodossa ppkkvv-xxxx. Käytä virallista muotoa ilman välilyöntejä.",
            action: "Syötä henkilötunnus täsmälleen virallisessa muodossa.",
            example: "131052-308T",
            tips: "Viimeinen merkki on tarkistusmerkki, joten tarkista se huolellisesti.",
        },
    },
    ClassificationRule {
        category: FieldCategory::FirstName,
        keywords: &["etunimi", "förnamn", "first name"],
        template: Template::Canned {
            explanation: "Kirjoita etunimi täsmälleen virallisissa asiakirjoissa olevassa muodossa.",
            action: "Käytä samaa etunimeä kuin henkilöllisyystodistuksessa.",
            example: "Matti",
            tips: "Jos sinulla on useita etunimiä, kirjoita ne kaikki, ellei lomake pyydä vain kutsumanimeä.",
        },
    },
    ClassificationRule {
        category: FieldCategory::LastName,
        keywords: &["sukunimi", "efternamn", "last name", "surname"],
        template: Template::Canned {
            explanation: "Kirjoita sukunimi virallisessa muodossa.",
            action: "Käytä virallista sukunimeä ilman lyhenteitä.",
            example: "Virtanen",
            tips: "Jos sukunimesi on muuttunut, käytä nykyistä virallista sukunimeä.",
        },
    },
    ClassificationRule {
        category: FieldCategory::Address,
        keywords: &["osoite", "adress", "address", "street"],
        template: Template::Canned {
            explanation: "Anna katuosoite talon- ja mahdollinen huoneistonumero mukaan lukien.",
            action: "Kirjoita katuosoite täsmälleen lomakkeen pyytämässä muodossa.",
            example: "Esimerkkikatu 5 A 2",
            tips: "Jos asut toisen henkilön nimissä olevassa asunnossa, lisää c/o-merkintä.",
        },
    },
    ClassificationRule {
        category: FieldCategory::PostalCode,
        keywords: &["postinumero", "postnr", "zip", "postcode"],
        template: Template::Canned {
            explanation: "Anna postinumero ilman kirjaimia.",
            action: "Syötä numerot ilman välilyöntejä.",
            example: "00100",
            tips: "Suomalaisessa postinumerossa on aina viisi numeroa.",
        },
    },
    ClassificationRule {
        category: FieldCategory::Phone,
        keywords: &["puhelin", "telefon", "phone", "mobile"],
        template: Template::Canned {
            explanation: "Anna puhelinnumero maatunnuksella.",
            action: "Käytä kansainvälistä muotoa (+maa-koodi) ja poista turhat välit.",
            example: "+358 40 1234567",
            tips: "Anna numero, josta sinut tavoittaa virka-aikaan.",
        },
    },
    ClassificationRule {
        category: FieldCategory::Email,
        keywords: &["sähköposti", "e-mail", "email", "eposti", "e-post"],
        template: Template::Canned {
            explanation: "Anna toimiva sähköpostiosoite.",
            action: "Varmista että osoite on käytössä ja kirjoita se ilman ylimääräisiä välilyöntejä.",
            example: "etunimi.sukunimi@example.com",
            tips: "Päätös tai lisäselvityspyyntö voi tulla sähköpostitse, joten tarkista osoite kahdesti.",
        },
    },
    ClassificationRule {
        category: FieldCategory::BankAccount,
        keywords: &["iban", "tilinumero", "bank account"],
        template: Template::Canned {
            explanation: "Syötä tilinumero IBAN-muodossa ilman välilyöntejä.",
            action: "Käytä virallista IBAN-muotoa. Poista erikoismerkit jos lomake niin pyytää.",
            example: "FI21 1234 5600 0007 85",
            tips: "Tilinumeron löydät verkkopankista tai tiliotteesta.",
        },
    },
    ClassificationRule {
        category: FieldCategory::Date,
        keywords: &["päivämäär", "datum", "date"],
        template: Template::Canned {
            explanation: "Anna päivämäärä pyydetyssä muodossa (esim. pp.kk.vvvv).",
            action: "Käytä samaa erottelutapaa kuin lomakkeessa, älä käytä kirjaimia.",
            example: "31.12.2025",
            tips: "Tarkista, kysytäänkö syntymäaikaa vai jonkin tapahtuman päivämäärää.",
        },
    },
    ClassificationRule {
        category: FieldCategory::Amount,
        keywords: &["summa", "belopp", "amount", "eur", "€"],
        template: Template::Canned {
            explanation: "Anna rahamäärä numeroina. Käytä pilkkua tai pistettä desimaalierottimena ohjeen mukaan.",
            action: "Älä lisää valuuttamerkkiä ellei lomake pyydä sitä.",
            example: "1234,56",
            tips: "Pyöristä summa vain, jos lomake sen sallii.",
        },
    },
    // "ja", "ei" and "no" are loose substrings and also fire inside
    // unrelated words. Kept as-is until the intended behaviour is decided.
    ClassificationRule {
        category: FieldCategory::Choice,
        keywords: &["kyllä", "ja", "nej", "ei", "yes", "no", "valitse", "rastita"],
        template: Template::Canned {
            explanation: "Valitse vaihtoehto, joka vastaa tilannettasi.",
            action: "Jos mikään vaihtoehdoista ei sovi, seuraa lomakkeen ohjeita lisäselvityksen antamiseksi.",
            example: "Rastita 'Kyllä' jos ehto toteutuu, muuten 'Ei'.",
            tips: "Valitse vain yksi vaihtoehto, ellei lomake salli useampaa.",
        },
    },
    ClassificationRule {
        category: FieldCategory::Generic,
        keywords: &[],
        template: Template::Generic,
    },
];

/// Ordered keyword classifier over [`RULES`].
#[derive(Debug, Clone, Copy)]
pub struct FieldClassifier {
    rules: &'static [ClassificationRule],
}

impl Default for FieldClassifier {
    fn default() -> Self {
        Self { rules: RULES }
    }
}

impl FieldClassifier {
    /// First rule whose keywords occur in `label + " " + context`.
    pub fn rule_for(&self, field_label: &str, section_context: &str) -> &'static ClassificationRule {
        let haystack = format!("{} {}", field_label.trim(), section_context).to_lowercase();
        let rules = self.rules;
        rules
            .iter()
            .find(|rule| rule.matches(&haystack))
            .unwrap_or(&rules[rules.len() - 1])
    }

    pub fn category(&self, field_label: &str, section_context: &str) -> FieldCategory {
        self.rule_for(field_label, section_context).category
    }

    /// Callers must pass an already masked label; the catch-all echoes it back.
    pub fn classify(&self, field_label: &str, section_context: &str) -> FieldExplanation {
        self.rule_for(field_label, section_context)
            .template
            .render(field_label.trim())
    }
}
