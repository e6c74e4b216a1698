//! keys.rs — Closed key sets for sub-fund line items and distribution allocations.
//!
//! Every statutory clause a record may carry is a variant with an explicit
//! wire token. Unknown tokens fail deserialization; `ALL` enumerates the set in
//! declaration order so tables and folds can be checked against it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::CoreError;

/// Define a line-item key enum with explicit wire tokens, `ALL`, `as_str`, `Display`.
macro_rules! line_item_keys {
    ($(#[$meta:meta])* $name:ident => { $($variant:ident = $token:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $token)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }
        }

        impl LineItemKey for $name {
            #[inline]
            fn wire(self) -> &'static str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Common surface of every key set.
pub trait LineItemKey: Copy + Ord + fmt::Debug {
    fn wire(self) -> &'static str;
}

line_item_keys!(
    /// Employee (non-executive, non-EQ) fund: "fondo accessorio personale dipendente".
    EmployeeItem => {
        UnicoImporto2017 = "st_art79c1_art67c1_unicoImporto2017",
        AlteProfessionalitaNonUtil = "st_art79c1_art67c1_alteProfessionalitaNonUtil",
        Incremento8320 = "st_art79c1_art67c2a_incr8320",
        IncrementiStipendialiDiff = "st_art79c1_art67c2b_incrStipendialiDiff",
        IntegrazioneRia = "st_art79c1_art4c2_art67c2c_integrazioneRIA",
        RisorseRiassorbite165 = "st_art79c1_art67c2d_risorseRiassorbite165",
        PersonaleTrasferito = "st_art79c1_art15c1l_art67c2e_personaleTrasferito",
        RegioniRiduzioneDirigenza = "st_art79c1_art15c1i_art67c2f_regioniRiduzioneDirig",
        RiduzioneStraordinario = "st_art79c1_art14c3_art67c2g_riduzioneStraordinario",
        TaglioFondoDl78 = "st_taglioFondoDL78_2010",
        RiduzioniPersonaleAtaPo = "st_riduzioniPersonaleATA_PO_Esternalizzazioni",
        DecurtazionePoApEntiDirigenza = "st_art67c1_decurtazionePO_AP_EntiDirigenza",
        Euro8450 = "st_art79c1b_euro8450",
        IncrementoConsistenzaPersonale = "st_art79c1c_incrementoStabileConsistenzaPers",
        DifferenzialiStipendiali2022 = "st_art79c1d_differenzialiStipendiali2022",
        DifferenzialiB3D3 = "st_art79c1bis_diffStipendialiB3D3",
        IncrementoDecretoPa = "st_incrementoDecretoPA",
        RiduzionePerIncrementoEq = "st_riduzionePerIncrementoEQ",
        RecuperoEvasione = "vs_art4c3_art15c1k_art67c3c_recuperoEvasione",
        IntegrazioneRiaMensile = "vs_art4c2_art67c3d_integrazioneRIAMensile",
        PersonaleCaseGioco = "vs_art67c3g_personaleCaseGioco",
        MonteSalari1997 = "vs_art79c2b_max1_2MonteSalari1997",
        IntegrazionePersonaleTrasferito = "vs_art67c3k_integrazioneArt62c2e_personaleTrasferito",
        RisorseScelteOrganizzative = "vs_art79c2c_risorseScelteOrganizzative",
        TotaleParzialeConfrontoTetto2016 = "cl_totaleParzialeRisorsePerConfrontoTetto2016",
        DecurtazioneTetto2016 = "cl_art23c2_decurtazioneIncrementoAnnualeTetto2016",
        SponsorConvenzioni = "vn_art15c1d_art67c3a_sponsorConvenzioni",
        RimborsoSpeseNotifica = "vn_art54_art67c3f_rimborsoSpeseNotifica",
        PianiRazionalizzazione = "vn_art15c1k_art16_dl98_art67c3b_pianiRazionalizzazione",
        IncentiviTecniciCondoni = "vn_art15c1k_art67c3c_incentiviTecniciCondoni",
        IncentiviSpeseGiudizioCensimenti = "vn_art18h_art67c3c_incentiviSpeseGiudizioCensimenti",
        RisparmiStraordinario = "vn_art15c1m_art67c3e_risparmiStraordinario",
        IncrementoPercentualeCittaMetro = "vn_art67c3j_regioniCittaMetro_art23c4_incrPercentuale",
        SommeNonUtilizzateStabili = "vn_art80c1_sommeNonUtilizzateStabiliPrec",
        IncentiviRiscossioneImuTari = "vn_l145_art1c1091_incentiviRiscossioneIMUTARI",
        RisparmiBuoniPasto2020 = "vn_l178_art1c870_risparmiBuoniPasto2020",
        AssunzioniDeroga = "vn_dl135_art11c1b_risorseAccessorieAssunzioniDeroga",
        MonteSalari2018Proporzionale = "vn_art79c3_022MonteSalari2018_da2022Proporzionale",
        Euro8450UnaTantum = "vn_art79c1b_euro8450_unaTantum2021_2022",
        MonteSalari2018UnaTantum = "vn_art79c3_022MonteSalari2018_da2022UnaTantum2022",
        IncrementoPnrr = "vn_dl13_art8c3_incrementoPNRR_max5stabile2016",
        MisureMancatoRispettoVincoli = "fin_art4_dl16_misureMancatoRispettoVincoli",
    }
);

line_item_keys!(
    /// High-qualification (Elevata Qualificazione) fund: resources and allocations.
    EqItem => {
        FondoPo2017 = "ris_fondoPO2017",
        IncrementoConRiduzioneFondoDipendenti = "ris_incrementoConRiduzioneFondoDipendenti",
        IncrementoLimiteDl34 = "ris_incrementoLimiteArt23c2_DL34",
        IncrementoMonteSalari2018 = "ris_incremento022MonteSalari2018",
        AdeguamentoTetto2016 = "fin_art23c2_adeguamentoTetto2016",
        RetribuzionePosizione = "st_art17c2_retribuzionePosizione",
        RetribuzionePosizioneArt16 = "st_art17c3_retribuzionePosizioneArt16c4",
        InterimEq = "st_art17c5_interimEQ",
        MaggiorazioneSedi = "st_art23c5_maggiorazioneSedi",
        RetribuzioneRisultato = "va_art17c4_retribuzioneRisultato",
    }
);

line_item_keys!(
    /// Municipal secretary fund.
    SecretaryItem => {
        RetribuzionePosizione2011 = "st_art3c6_CCNL2011_retribuzionePosizione",
        DifferenzialeAumento = "st_art58c1_CCNL2024_differenzialeAumento",
        RetribuzionePosizioneClassi = "st_art60c1_CCNL2024_retribuzionePosizioneClassi",
        MaggiorazioneComplessita = "st_art60c3_CCNL2024_maggiorazioneComplessita",
        AllineamentoDirigenzaEq = "st_art60c5_CCNL2024_allineamentoDirigEQ",
        RetribuzioneAggiuntivaConvenzioni = "st_art56c1g_CCNL2024_retribuzioneAggiuntivaConvenzioni",
        IndennitaReggenzaSupplenza = "st_art56c1h_CCNL2024_indennitaReggenzaSupplenza",
        DirittiSegreteria = "va_art56c1f_CCNL2024_dirittiSegreteria",
        AltriCompensiLegge = "va_art56c1i_CCNL2024_altriCompensiLegge",
        IncrementoPnrr = "va_art8c3_DL13_2023_incrementoPNRR",
        RetribuzioneRisultato10 = "va_art61c2_CCNL2024_retribuzioneRisultato10",
        RetribuzioneRisultato15 = "va_art61c2bis_CCNL2024_retribuzioneRisultato15",
        SuperamentoLimiteMetropolitane = "va_art61c2ter_CCNL2024_superamentoLimiteMetropolitane",
        IncrementoMonteSalari2018 = "va_art61c3_CCNL2024_incremento022MonteSalari2018",
        TotaleRisorseRilevantiLimite = "fin_totaleRisorseRilevantiLimite",
        PercentualeCopertura = "fin_percentualeCoperturaPostoSegretario",
    }
);

line_item_keys!(
    /// Executive (dirigenza) fund.
    ExecutiveItem => {
        UnicoImporto2020 = "st_art57c2a_CCNL2020_unicoImporto2020",
        RiaPersonaleCessato2020 = "st_art57c2a_CCNL2020_riaPersonaleCessato2020",
        IncrementoMonteSalari2015 = "st_art56c1_CCNL2020_incremento1_53MonteSalari2015",
        RiaCessatiAnnoSuccessivo = "st_art57c2c_CCNL2020_riaCessatidallAnnoSuccessivo",
        RisorseAutonomeStabili = "st_art57c2e_CCNL2020_risorseAutonomeStabili",
        IncrementoMonteSalari2018 = "st_art39c1_CCNL2024_incremento2_01MonteSalari2018",
        RisorseLeggeSponsor = "va_art57c2b_CCNL2020_risorseLeggeSponsor",
        SommeOnnicomprensivita = "va_art57c2d_CCNL2020_sommeOnnicomprensivita",
        RisorseAutonomeVariabili = "va_art57c2e_CCNL2020_risorseAutonomeVariabili",
        ResiduiAnnoPrecedente = "va_art57c3_CCNL2020_residuiAnnoPrecedente",
        IncrementoPnrr = "va_dl13_2023_art8c3_incrementoPNRR",
        Recupero046MonteSalari2018 = "va_art39c1_CCNL2024_recupero0_46MonteSalari2018_2020",
        Recupero201MonteSalari2018 = "va_art39c1_CCNL2024_recupero2_01MonteSalari2018_2021_2023",
        Valorizzazione022MonteSalari2018 = "va_art39c2_CCNL2024_incremento0_22MonteSalari2018_valorizzazione",
        IncrementoDerogaDl34 = "va_art33c2_DL34_2019_incrementoDeroga",
        TotaleParzialeConfrontoTetto2016 = "lim_totaleParzialeRisorseConfrontoTetto2016",
        AdeguamentoAnnualeTetto2016 = "lim_art23c2_DLGS75_2017_adeguamentoAnnualeTetto2016",
        MisureMancatoRispettoVincoli = "lim_art4_DL16_2014_misureMancatoRispettoVincoli",
    }
);

line_item_keys!(
    /// Variable-part allocations in the resource distribution record (`p_*`).
    AllocationItem => {
        PerformanceOrganizzativa = "p_performanceOrganizzativa",
        PerformanceIndividuale = "p_performanceIndividuale",
        MaggiorazionePerformanceIndividuale = "p_maggiorazionePerformanceIndividuale",
        IndennitaCondizioniLavoro = "p_indennitaCondizioniLavoro",
        IndennitaTurno = "p_indennitaTurno",
        IndennitaReperibilita = "p_indennitaReperibilita",
        IndennitaLavoroGiornoRiposo = "p_indennitaLavoroGiornoRiposo",
        CompensiSpecificheResponsabilita = "p_compensiSpecificheResponsabilita",
        IndennitaFunzione = "p_indennitaFunzione",
        IndennitaServizioEsterno = "p_indennitaServizioEsterno",
        ObiettiviPoliziaLocale = "p_obiettiviPoliziaLocale",
        IncentiviContoTerzi = "p_incentiviContoTerzi",
        CompensiAvvocatura = "p_compensiAvvocatura",
        IncentiviCondonoFunzioniTecnichePre2018 = "p_incentiviCondonoFunzioniTecnichePre2018",
        IncentiviFunzioniTecnichePost2018 = "p_incentiviFunzioniTecnichePost2018",
        IncentiviImuTari = "p_incentiviIMUTARI",
        CompensiMessiNotificatori = "p_compensiMessiNotificatori",
        CompensiCaseGioco = "p_compensiCaseGioco",
        CompensiCaseGiocoNonCoperti = "p_compensiCaseGiocoNonCoperti",
        DiffStipendialiAnniPrec = "p_diffStipendialiAnniPrec",
        DiffStipendialiAnnoCorrente = "p_diffStipendialiAnnoCorrente",
        PianiWelfare = "p_pianiWelfare",
    }
);

impl AllocationItem {
    /// Allocations derived from the distribution criteria unless manually overridden.
    pub const DERIVED: [AllocationItem; 3] = [
        AllocationItem::PerformanceIndividuale,
        AllocationItem::PerformanceOrganizzativa,
        AllocationItem::MaggiorazionePerformanceIndividuale,
    ];

    #[inline]
    pub fn is_derived(self) -> bool {
        Self::DERIVED.contains(&self)
    }
}

// ---------- Line-item record ----------

/// Flat mapping from a clause key to an amount. Absent keys read as zero.
///
/// JSON `null` values deserialize as absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LineItems<K: Ord>(BTreeMap<K, f64>);

impl<K: Ord> Default for LineItems<K> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<K: Ord + Copy> LineItems<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored amount, `None` when absent.
    #[inline]
    pub fn get(&self, key: K) -> Option<f64> {
        self.0.get(&key).copied()
    }

    /// Stored amount, zero when absent.
    #[inline]
    pub fn value(&self, key: K) -> f64 {
        self.get(key).unwrap_or(0.0)
    }

    /// Sum of stored amounts over `keys` (absent = 0).
    pub fn sum_of(&self, keys: &[K]) -> f64 {
        keys.iter().map(|k| self.value(*k)).sum()
    }

    pub fn set(&mut self, key: K, amount: f64) -> &mut Self {
        self.0.insert(key, amount);
        self
    }

    /// Builder form of [`LineItems::set`].
    pub fn with(mut self, key: K, amount: f64) -> Self {
        self.0.insert(key, amount);
        self
    }

    pub fn remove(&mut self, key: K) -> Option<f64> {
        self.0.remove(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: LineItemKey> LineItems<K> {
    /// Fails on the first stored amount that is NaN or infinite.
    pub fn ensure_finite(&self) -> Result<(), CoreError> {
        match self.0.iter().find(|(_, v)| !v.is_finite()) {
            Some((k, _)) => Err(CoreError::NonFiniteAmount(k.wire())),
            None => Ok(()),
        }
    }
}

impl<K: Ord> FromIterator<(K, f64)> for LineItems<K> {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de, K> Deserialize<'de> for LineItems<K>
where
    K: Ord + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<K, Option<f64>>::deserialize(d)?;
        Ok(Self(
            raw.into_iter()
                .filter_map(|(k, v)| v.map(|v| (k, v)))
                .collect(),
        ))
    }
}
