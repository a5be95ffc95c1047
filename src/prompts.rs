//! Fixed per-locale texts: system instructions, postscripts, apologies and
//! placeholders.
//!
//! Every table is keyed by [`Locale`]. Lookups for a locale missing from a
//! table fall back to the English entry.

use std::collections::HashMap;

use crate::locale::Locale;

lazy_static::lazy_static! {
    static ref SYSTEM_INSTRUCTIONS: HashMap<Locale, &'static str> = HashMap::from([
        (
            Locale::Lithuanian,
            "Tu esi dirbtinio intelekto asistentas, padedantis pradedantiesiems mokytis apie dirbtinį intelektą. \
Vartotojai lanko savo pirmąją dirbtinio intelekto pamoką Visagine.\n\
Atsakyk TIK lietuvių kalba, nepriklausomai nuo to, kokia kalba užduotas klausimas.\n\
Atsakymo struktūra:\n\
- naudok sąrašus su ženkleliais;\n\
- tarp pastraipų palik tuščią eilutę;\n\
- veiksmus numeruok (1., 2., 3.);\n\
- rašyk trumpomis pastraipomis.\n\
Atsakyk tik į klausimus, susijusius su dirbtinio intelekto mokymusi. \
Jei klausimas nesusijęs su šia tema, mandagiai paaiškink, kad jis nesusijęs su dirbtinio intelekto mokymusi.",
        ),
        (
            Locale::Russian,
            "Ты ассистент по искусственному интеллекту, который помогает новичкам изучать искусственный интеллект. \
Пользователи посещают свой первый урок по искусственному интеллекту в Висагинасе.\n\
Отвечай ТОЛЬКО на русском языке, независимо от языка вопроса.\n\
Структура ответа:\n\
- используй маркированные списки;\n\
- оставляй пустую строку между абзацами;\n\
- нумеруй шаги (1., 2., 3.);\n\
- пиши короткими абзацами.\n\
Отвечай только на вопросы, связанные с изучением искусственного интеллекта. \
Если вопрос не относится к этой теме, вежливо объясни, что он не связан с изучением искусственного интеллекта.",
        ),
        (
            Locale::English,
            "You are an AI assistant designed to help beginners learn about artificial intelligence. \
Users are attending their first AI lesson in Visaginas.\n\
Reply ONLY in English, regardless of the language of the question.\n\
Structure every answer:\n\
- use bullet lists;\n\
- leave a blank line between paragraphs;\n\
- number any steps (1., 2., 3.);\n\
- keep paragraphs short.\n\
Only answer questions that are directly related to learning about artificial intelligence. \
For off-topic questions, politely explain that the question is not related to AI learning.",
        ),
    ]);

    static ref POSTSCRIPTS: HashMap<Locale, &'static str> = HashMap::from([
        (
            Locale::Lithuanian,
            "«Kviečiu visus į nemokamą 20 minučių konsultaciją apie dirbtinį intelektą! \
Registracija: https://ai-visaginas.lt/konsultacija»",
        ),
        (
            Locale::Russian,
            "«Приглашаю всех на бесплатную 20-минутную консультацию по искусственному интеллекту! \
Запись: https://ai-visaginas.lt/konsultacija»",
        ),
        (
            Locale::English,
            "«Join a free 20-minute consultation about artificial intelligence! \
Sign up: https://ai-visaginas.lt/konsultacija»",
        ),
    ]);

    static ref APOLOGIES: HashMap<Locale, &'static str> = HashMap::from([
        (Locale::Lithuanian, "Atsiprašome, įvyko klaida. Prašome bandyti dar kartą."),
        (Locale::Russian, "Извините, произошла ошибка. Пожалуйста, попробуйте еще раз."),
        (Locale::English, "Sorry, an error occurred. Please try again."),
    ]);

    static ref NO_REPLY_PLACEHOLDERS: HashMap<Locale, &'static str> = HashMap::from([
        (Locale::Lithuanian, "Atsakymas nebuvo sugeneruotas."),
        (Locale::Russian, "Ответ не был сгенерирован."),
        (Locale::English, "No reply was generated."),
    ]);
}

fn lookup(table: &HashMap<Locale, &'static str>, locale: Locale) -> &'static str {
    table
        .get(&locale)
        .or_else(|| table.get(&Locale::English))
        .copied()
        .unwrap_or_default()
}

/// Instruction that pins the reply language and layout for `locale`.
pub fn system_instruction(locale: Locale) -> &'static str {
    lookup(&SYSTEM_INSTRUCTIONS, locale)
}

/// Promotional blurb appended after every generated reply.
pub fn postscript(locale: Locale) -> &'static str {
    lookup(&POSTSCRIPTS, locale)
}

/// Canned reply used when the completion provider fails.
pub fn apology(locale: Locale) -> &'static str {
    lookup(&APOLOGIES, locale)
}

/// Stand-in for a provider reply that carried no text.
pub fn no_reply_placeholder(locale: Locale) -> &'static str {
    lookup(&NO_REPLY_PLACEHOLDERS, locale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_locale_has_every_text() {
        for locale in Locale::ALL {
            assert!(!system_instruction(locale).is_empty());
            assert!(!postscript(locale).is_empty());
            assert!(!apology(locale).is_empty());
            assert!(!no_reply_placeholder(locale).is_empty());
        }
    }

    #[test]
    fn test_tables_have_exactly_the_supported_locales() {
        assert_eq!(SYSTEM_INSTRUCTIONS.len(), Locale::ALL.len());
        assert_eq!(POSTSCRIPTS.len(), Locale::ALL.len());
        for locale in Locale::ALL {
            assert!(SYSTEM_INSTRUCTIONS.contains_key(&locale));
            assert!(POSTSCRIPTS.contains_key(&locale));
        }
    }

    #[test]
    fn test_instructions_mandate_their_language() {
        assert!(system_instruction(Locale::Lithuanian).contains("lietuvių kalba"));
        assert!(system_instruction(Locale::Russian).contains("на русском языке"));
        assert!(system_instruction(Locale::English).contains("ONLY in English"));
    }

    #[test]
    fn test_postscripts_contain_a_link() {
        for locale in Locale::ALL {
            assert!(postscript(locale).contains("https://"));
        }
        assert!(postscript(Locale::Lithuanian).starts_with("«Kviečiu visus į nemokamą 20 minučių"));
    }

    #[test]
    fn test_lookup_falls_back_to_english() {
        let partial: HashMap<Locale, &'static str> = HashMap::from([(Locale::English, "fallback")]);
        assert_eq!(lookup(&partial, Locale::Russian), "fallback");
        assert_eq!(lookup(&HashMap::new(), Locale::Russian), "");
    }

    #[test]
    fn test_russian_apology_text() {
        assert_eq!(
            apology(Locale::Russian),
            "Извините, произошла ошибка. Пожалуйста, попробуйте еще раз."
        );
    }
}
