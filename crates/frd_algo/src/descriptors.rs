//! crates/frd_algo/src/descriptors.rs
//! Employee-fund line-item descriptors: section, sign, cap relevance, distress gating.
//!
//! The table is a `match` over `EmployeeItem`, so a new clause does not compile
//! until it has a descriptor. Section totals are a fold over this table
//! (see `subfunds::employee`); no formula names individual keys.

use frd_core::keys::EmployeeItem;
use serde::Serialize;

/// Which total a line item feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Stable,
    VariableSubject,
    VariableNotSubject,
    FinalDeduction,
    /// Decurtation applied after the cap comparison.
    CapVerification,
    /// Pre-decurtation running subtotal compared against the cap. Never summed.
    CapReference,
}

impl Section {
    /// Sections whose signed sum makes up the variable component.
    pub const VARIABLE: [Section; 4] = [
        Section::VariableSubject,
        Section::VariableNotSubject,
        Section::FinalDeduction,
        Section::CapVerification,
    ];

    pub fn is_variable(self) -> bool {
        Self::VARIABLE.contains(&self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItemDescriptor {
    pub key: EmployeeItem,
    pub section: Section,
    pub subtractor: bool,
    /// Counts toward the 2016 baseline comparison.
    pub relevant_to_cap: bool,
    /// Forced to zero when the entity is in financial distress.
    pub disabled_under_distress: bool,
}

impl LineItemDescriptor {
    const fn new(key: EmployeeItem, section: Section) -> Self {
        Self {
            key,
            section,
            subtractor: false,
            relevant_to_cap: false,
            disabled_under_distress: false,
        }
    }

    const fn subtracts(mut self) -> Self {
        self.subtractor = true;
        self
    }

    const fn capped(mut self) -> Self {
        self.relevant_to_cap = true;
        self
    }

    const fn distress_gated(mut self) -> Self {
        self.disabled_under_distress = true;
        self
    }

    /// Effective amount with the descriptor's sign applied.
    #[inline]
    pub fn signed(&self, amount: f64) -> f64 {
        if self.subtractor {
            -amount
        } else {
            amount
        }
    }
}

const fn d(key: EmployeeItem, section: Section) -> LineItemDescriptor {
    LineItemDescriptor::new(key, section)
}

/// Descriptor for one employee-fund key.
pub const fn descriptor(key: EmployeeItem) -> LineItemDescriptor {
    use EmployeeItem::*;
    use Section::*;

    match key {
        UnicoImporto2017 => d(key, Stable).capped(),
        AlteProfessionalitaNonUtil => d(key, Stable).capped(),
        Incremento8320 => d(key, Stable),
        IncrementiStipendialiDiff => d(key, Stable),
        IntegrazioneRia => d(key, Stable).capped(),
        RisorseRiassorbite165 => d(key, Stable).capped(),
        PersonaleTrasferito => d(key, Stable).capped(),
        RegioniRiduzioneDirigenza => d(key, Stable).capped(),
        RiduzioneStraordinario => d(key, Stable).capped(),
        TaglioFondoDl78 => d(key, Stable).subtracts().capped(),
        RiduzioniPersonaleAtaPo => d(key, Stable).subtracts().capped(),
        DecurtazionePoApEntiDirigenza => d(key, Stable).subtracts().capped(),
        Euro8450 => d(key, Stable),
        IncrementoConsistenzaPersonale => d(key, Stable).capped(),
        DifferenzialiStipendiali2022 => d(key, Stable),
        DifferenzialiB3D3 => d(key, Stable),
        IncrementoDecretoPa => d(key, Stable).distress_gated(),
        RiduzionePerIncrementoEq => d(key, Stable).subtracts().capped(),

        RecuperoEvasione => d(key, VariableSubject).capped(),
        IntegrazioneRiaMensile => d(key, VariableSubject).capped(),
        PersonaleCaseGioco => d(key, VariableSubject).capped(),
        MonteSalari1997 => d(key, VariableSubject).capped().distress_gated(),
        IntegrazionePersonaleTrasferito => d(key, VariableSubject).capped(),
        RisorseScelteOrganizzative => d(key, VariableSubject).capped().distress_gated(),

        TotaleParzialeConfrontoTetto2016 => d(key, CapReference),
        DecurtazioneTetto2016 => d(key, CapVerification).subtracts(),

        SponsorConvenzioni => d(key, VariableNotSubject),
        RimborsoSpeseNotifica => d(key, VariableNotSubject),
        PianiRazionalizzazione => d(key, VariableNotSubject),
        IncentiviTecniciCondoni => d(key, VariableNotSubject),
        IncentiviSpeseGiudizioCensimenti => d(key, VariableNotSubject),
        RisparmiStraordinario => d(key, VariableNotSubject),
        IncrementoPercentualeCittaMetro => d(key, VariableNotSubject),
        SommeNonUtilizzateStabili => d(key, VariableNotSubject),
        IncentiviRiscossioneImuTari => d(key, VariableNotSubject),
        RisparmiBuoniPasto2020 => d(key, VariableNotSubject),
        AssunzioniDeroga => d(key, VariableNotSubject),
        MonteSalari2018Proporzionale => d(key, VariableNotSubject),
        Euro8450UnaTantum => d(key, VariableNotSubject),
        MonteSalari2018UnaTantum => d(key, VariableNotSubject),
        IncrementoPnrr => d(key, VariableNotSubject).distress_gated(),

        MisureMancatoRispettoVincoli => d(key, FinalDeduction).subtracts(),
    }
}

/// All employee descriptors, in key declaration order.
pub fn employee_descriptors() -> impl Iterator<Item = LineItemDescriptor> {
    EmployeeItem::ALL.iter().map(|k| descriptor(*k))
}
