//! Legal clause list
//!
//! Clauses are declared in document order. Conditional clauses carry a
//! predicate; numbers are handed out at render time over the clauses that
//! apply, so adding the workshop clauses shifts every later number.

use crate::config::AgreementConfig;

/// Identity of a numbered clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKind {
    Promotion,
    Recording,
    CreativeCommons,
    NoObligation,
    Warranties,
    Considerations,
    WorkshopTickets,
    WorkshopNotice,
    Cancellation,
    EntireAgreement,
}

/// An entry of the clause list
#[derive(Debug, Clone, Copy)]
pub enum Clause {
    Always(ClauseKind),
    When(fn(&AgreementConfig) -> bool, ClauseKind),
}

impl Clause {
    pub fn kind(&self) -> ClauseKind {
        match self {
            Clause::Always(kind) | Clause::When(_, kind) => *kind,
        }
    }

    pub fn applies(&self, config: &AgreementConfig) -> bool {
        match self {
            Clause::Always(_) => true,
            Clause::When(predicate, _) => predicate(config),
        }
    }
}

/// A clause with its number assigned
#[derive(Debug, Clone, PartialEq)]
pub struct NumberedClause {
    pub number: usize,
    pub kind: ClauseKind,
    /// Body text, starting right after the number
    pub text: String,
}

/// Every clause of the agreement, in order
pub fn agreement_clauses() -> [Clause; 10] {
    [
        Clause::Always(ClauseKind::Promotion),
        Clause::Always(ClauseKind::Recording),
        Clause::Always(ClauseKind::CreativeCommons),
        Clause::Always(ClauseKind::NoObligation),
        Clause::Always(ClauseKind::Warranties),
        Clause::Always(ClauseKind::Considerations),
        Clause::When(AgreementConfig::has_workshop, ClauseKind::WorkshopTickets),
        Clause::When(AgreementConfig::has_workshop, ClauseKind::WorkshopNotice),
        Clause::Always(ClauseKind::Cancellation),
        Clause::Always(ClauseKind::EntireAgreement),
    ]
}

/// Applicable clauses, numbered from 1
pub fn numbered_clauses(config: &AgreementConfig) -> Vec<NumberedClause> {
    agreement_clauses()
        .iter()
        .filter(|clause| clause.applies(config))
        .enumerate()
        .map(|(index, clause)| NumberedClause {
            number: index + 1,
            kind: clause.kind(),
            text: clause_text(clause.kind(), config),
        })
        .collect()
}

/// What the speaker contributes, e.g. "Presentation and/or Workshop"
pub fn subject(config: &AgreementConfig) -> &'static str {
    match (config.has_presentation(), config.has_workshop()) {
        (true, true) => "Presentation and/or Workshop",
        (false, true) => "Workshop",
        _ => "Presentation",
    }
}

/// Items of the considerations clause that apply
pub fn considerations(config: &AgreementConfig) -> Vec<String> {
    let mut items = vec!["the speaking opportunity provided to you by FCA".to_string()];

    if !config.origin.is_local() {
        items.push(format!(
            "accommodation at a hotel booked by FCA for up to {} nights",
            config.hotel_nights()
        ));
        items.push(
            "a round trip economy class airline ticket from the departure city stated below \
             to Zurich booked by FCA"
                .to_string(),
        );
    }

    if config.has_presentation() {
        let compensation = config
            .compensation
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        items.push(format!(
            "a compensation for the Presentation of {compensation} CHF (Swiss Francs) to be \
             paid within 60 days after the conference, pursuant to providing an invoice to \
             FCA’s accounting department, including wire transfer details or other means of \
             payment"
        ));
    }

    if config.has_workshop() {
        items.push(
            "a share of 50% of the Workshop ticket revenue, net of venue, catering, \
             ticketing fees and the travel and accommodation expenses listed above, to be \
             paid within 60 days after the conference"
                .to_string(),
        );
    }

    items
}

/// Lower-case roman numeral
pub fn roman(mut n: usize) -> String {
    const NUMERALS: [(usize, &str); 7] = [
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
    ];

    let mut out = String::new();
    for (value, numeral) in NUMERALS {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    match n {
        4 => out.push_str("iv"),
        _ => out.push_str(&"i".repeat(n)),
    }
    out
}

/// Join items as "(i) a; (ii) b; and (iii) c"
pub fn enumerate(items: &[String]) -> String {
    let count = items.len();
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let prefix = if count > 1 && index == count - 1 {
                "and "
            } else {
                ""
            };
            format!("{prefix}({}) {item}", roman(index + 1))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn clause_text(kind: ClauseKind, config: &AgreementConfig) -> String {
    let subject = subject(config);

    match kind {
        ClauseKind::Promotion => format!(
            "FCA will promote your {subject} on social media, the Event’s website and other \
             channels.\nFor this purpose, you agree to provide FCA and grant FCA the right to \
             use {subject} outlines and supporting information, such as your name, voice, \
             photograph, likeness and biographical data (collectively, \"Supporting \
             Information\")."
        ),
        ClauseKind::Recording => format!(
            "FCA supports the spread of fresh ideas and practices around Technology and Design \
             by making presentations freely and widely available to a broad audience. For this \
             purpose, all presentations held at the Event are streamed live, and recorded for \
             further display on FCA’s Vimeo channel, on FCA’s website or other video \
             distribution channels.\n\nYou grant FCA and other entities, e.g. broadcasters, the \
             right to record, stream, film and photograph your {subject} at the Event and to \
             distribute, broadcast, edit, translate or otherwise disseminate it, without any \
             further approval from you, in whole or in part, throughout the world, in \
             perpetuity, in any and all media now known or hereafter developed. This grant to \
             the FCA includes, but is not limited to, the right to use the {subject} either \
             alone or together with Supporting Information."
        ),
        ClauseKind::CreativeCommons => format!(
            "FCA encourages intelligent public debate around each presentation. Accordingly, \
             your {subject} may be distributed under a \"Creative Commons\" license, which \
             allows each distributed presentation to be re-published in noncommercial, \
             non-derivative works, as long as the appropriate credit is given and the \
             presentation is not edited or distorted. By signing this Consent, you acknowledge \
             and agree that you do not object to the distribution of the {subject} by the FCA \
             under a Creative Commons license."
        ),
        ClauseKind::NoObligation => format!(
            "In addition, you understand and agree that: (i) FCA isn’t obligated to use the \
             {subject} or Supporting Information in any way; (ii) you won’t receive any form \
             of payment in connection with the use of the {subject} and/or Supporting \
             Information."
        ),
        ClauseKind::Warranties => format!(
            "You affirm that: (i) you have the full power and authority to grant the rights \
             and releases set forth in this Consent; (ii) you are the sole author of the \
             {subject}; (iii) you own all rights to the {subject}, including, but not limited \
             to, all copyrights and trademark rights; (iv) you will advise FCA in writing of \
             all third-party material contained in the {subject} (to which you have not \
             secured all necessary rights); (v) use of the {subject} as permitted by this \
             Consent will not violate the rights of any third party, and (vi) you may not \
             revoke the rights granted in this Consent.\n\nIf any third party claims that the \
             use of the {subject} violates its rights, you agree to cooperate fully with FCA \
             to defend against or otherwise respond to such claim."
        ),
        ClauseKind::Considerations => format!(
            "You acknowledge and agree that the only considerations you will receive in \
             connection with this Consent are: {}.",
            enumerate(&considerations(config))
        ),
        ClauseKind::WorkshopTickets => "FCA sells tickets for the Workshop together with the \
             Event tickets. Should fewer than 10 Workshop tickets be sold 30 days prior to the \
             Workshop, FCA may cancel the Workshop. In that case the Workshop related \
             considerations lapse and no further claims arise for either party."
            .to_string(),
        ClauseKind::WorkshopNotice => "You agree to inform FCA about any other workshop you \
             hold in Switzerland within 3 months before or after the Event, and not to hold a \
             workshop on the same or a substantially similar topic in Zurich during that \
             period without the written consent of FCA."
            .to_string(),
        ClauseKind::Cancellation => cancellation_text(config),
        ClauseKind::EntireAgreement => "This Consent contains the entire understanding \
             between you and FCA regarding the Presentation and Supporting Information and may \
             not be modified except in writing signed by both parties."
            .to_string(),
    }
}

fn cancellation_text(config: &AgreementConfig) -> String {
    let mut text = String::from(
        "FCA and the Event are run by web professionals in their spare time without any \
         financial incentive. These circumstances complicate finding replacements, if a \
         speaker cancels their participation at the Event on a short notice, and exacerbate \
         thereby incurred expenses.\n\nIf you must cancel your appearance at the Event, you \
         agree that you will notify FCA at least 60 days prior to the date of the first day \
         of the conference.",
    );

    if config.origin.is_local() {
        text.push_str(
            " In the event that you fail to appear or perform pursuant to the terms of this \
             agreement, you shall try to help FCA find a replacement speaker of the same \
             caliber.",
        );
    } else {
        text.push_str(
            " In the event that you fail to appear or perform pursuant to the terms of this \
             agreement, you understand that you shall be responsible for covering the costs of \
             the already booked flights and you shall try to help FCA find a replacement \
             speaker of the same caliber. Shall you fail to appear or cancel later than 3 days \
             prior to your scheduled arrival and should we not find a replacement, you shall \
             cover the costs of the booked hotel nights.",
        );
    }

    text.push_str(" Cancellations due to illness, accident or attenuating circumstances are exempted.");
    text
}
