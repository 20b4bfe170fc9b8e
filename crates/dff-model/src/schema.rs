//! Column type catalogue for annotated variant tables.
//!
//! Annotation pipelines (ANNOVAR, dbNSFP, VCF INFO fields) emit a few hundred
//! well-known columns. Tables are always read as text first; only the columns
//! this catalogue declares numeric are coerced to floating point afterwards.

use std::collections::BTreeSet;
use std::fmt;


/// Built-in numeric columns: positions, population frequencies and
/// pathogenicity scores.
const BUILTIN_NUMERIC: &[&str] = &[
    "Start",
    "End",
    "vardb_life",
    "vardb_gatk",
    "vardb_tvc",
    "GATK.counts",
    "GATK.Depth",
    "TVC.counts",
    "TVC.Depth",
    "PopFreqMax",
    "MaxPopFreq",
    "1000G_ALL",
    "1000G_AFR",
    "1000G_AMR",
    "1000G_EAS",
    "1000G_EUR",
    "1000G_SAS",
    "1000g2015aug_all",
    "1000g2015aug_afr",
    "1000g2015aug_amr",
    "1000g2015aug_eas",
    "1000g2015aug_eur",
    "1000g2015aug_sas",
    "ExAC_ALL",
    "ExAC_AFR",
    "ExAC_AMR",
    "ExAC_EAS",
    "ExAC_FIN",
    "ExAC_NFE",
    "ExAC_OTH",
    "ExAC_SAS",
    "ESP6500siv2_ALL",
    "ESP6500siv2_AA",
    "ESP6500siv2_EA",
    "gnomAD_genome_ALL",
    "gnomAD_genome_AFR",
    "gnomAD_genome_AMR",
    "gnomAD_genome_ASJ",
    "gnomAD_genome_EAS",
    "gnomAD_genome_FIN",
    "gnomAD_genome_NFE",
    "gnomAD_genome_OTH",
    "gnomAD_exome_ALL",
    "gnomAD_exome_AFR",
    "gnomAD_exome_AMR",
    "gnomAD_exome_ASJ",
    "gnomAD_exome_EAS",
    "gnomAD_exome_FIN",
    "gnomAD_exome_NFE",
    "gnomAD_exome_OTH",
    "gnomAD_exome_SAS",
    "CG46",
    "SIFT_score",
    "SIFT_converted_rankscore",
    "Polyphen2_HDIV_score",
    "Polyphen2_HDIV_rankscore",
    "Polyphen2_HVAR_score",
    "Polyphen2_HVAR_rankscore",
    "LRT_score",
    "LRT_converted_rankscore",
    "MutationTaster_score",
    "MutationTaster_converted_rankscore",
    "MutationAssessor_score",
    "MutationAssessor_score_rankscore",
    "FATHMM_score",
    "FATHMM_converted_rankscore",
    "PROVEAN_score",
    "PROVEAN_converted_rankscore",
    "VEST3_score",
    "VEST3_rankscore",
    "CADD_raw",
    "CADD_raw_rankscore",
    "CADD_phred",
    "DANN_score",
    "DANN_rankscore",
    "fathmm-MKL_coding_score",
    "fathmm-MKL_coding_rankscore",
    "MetaSVM_score",
    "MetaSVM_rankscore",
    "MetaLR_score",
    "MetaLR_rankscore",
    "M-CAP_score",
    "M-CAP_rankscore",
    "REVEL",
    "GenoCanyon_score",
    "GenoCanyon_score_rankscore",
    "Eigen-raw",
    "Eigen-PC-raw",
    "integrated_fitCons_score",
    "integrated_fitCons_score_rankscore",
    "integrated_confidence_value",
    "GERP++_RS",
    "GERP++_RS_rankscore",
    "phyloP7way_vertebrate",
    "phyloP20way_mammalian",
    "phyloP20way_mammalian_rankscore",
    "phyloP100way_vertebrate",
    "phyloP100way_vertebrate_rankscore",
    "phastCons7way_vertebrate",
    "phastCons20way_mammalian",
    "phastCons20way_mammalian_rankscore",
    "phastCons100way_vertebrate",
    "phastCons100way_vertebrate_rankscore",
    "SiPhy_29way_logOdds",
    "SiPhy_29way_logOdds_rankscore",
    "dbscSNV_ADA_SCORE",
    "dbscSNV_RF_SCORE",
    "dann",
    "PBP",
    "QT",
    "LEN",
    "HRUN",
    "MLLD",
    "PB",
    "FXX",
];

/// Built-in text columns: gene symbols, functional classes, predictions and
/// raw VCF fields.
const BUILTIN_TEXT: &[&str] = &[
    "Chr",
    "Ref",
    "Alt",
    "Callers",
    "TVC.samples",
    "vardb_1x",
    "Func.refGene",
    "Gene.refGene",
    "GeneDetail.refGene",
    "ExonicFunc.refGene",
    "AAChange.refGene",
    "Func.ensGene",
    "Gene.ensGene",
    "GeneDetail.ensGene",
    "ExonicFunc.ensGene",
    "AAChange.ensGene",
    "phastConsElements46way",
    "genomicSuperDups",
    "OMIM_id",
    "OMIM_ID",
    "OMIM_disorder",
    "OMIM_Disorder",
    "GeneReviews_disease",
    "GeneReviews_Disease",
    "GeneReviews_ID",
    "clinvar_20150330",
    "ClinVar_Phenotype",
    "ClinVar_Significance",
    "avsnp147",
    "snp144Flagged",
    "snp147Flagged",
    "cosmic70",
    "ICGC_Id",
    "ICGC_Occurrence",
    "GTEx_V6_gene",
    "GTEx_V6_tissue",
    "MCAP",
    "Eigen_coding_or_noncoding",
    "SIFT_pred",
    "Polyphen2_HDIV_pred",
    "Polyphen2_HVAR_pred",
    "LRT_pred",
    "MutationTaster_pred",
    "MutationAssessor_pred",
    "FATHMM_pred",
    "PROVEAN_pred",
    "fathmm-MKL_coding_pred",
    "MetaSVM_pred",
    "MetaLR_pred",
    "M-CAP_pred",
    "Interpro_domain",
    "Zygosity",
    "Qual",
    "Depth",
    "CHROM",
    "POS",
    "ID",
    "REF",
    "ALT",
    "QUAL",
    "FILTER",
    "AF",
    "AO",
    "DP",
    "FAO",
    "FDP",
    "FR",
    "FRO",
    "FSAF",
    "FSAR",
    "FSRF",
    "FSRR",
    "FWDB",
    "FXX HRUN",
    "LEN MLLD",
    "OALT",
    "OID",
    "OMAPALT",
    "OPOS",
    "OREF",
    "QD",
    "RBI",
    "REFB",
    "REVB",
    "RO",
    "SAF",
    "SAR",
    "SRF",
    "SRR",
    "SSEN",
    "SSEP",
    "SSSB",
    "STB",
    "STBP",
    "TYPE",
    "VARB",
    "GT",
    "GQ",
];

/// Semantic type of a recognized column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Coerced to `f64` at load time.
    Numeric,
    /// Kept as free-form text.
    Text,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Text => "text",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two disjoint sets of recognized column names.
///
/// Built once per run, optionally extended with [`ColumnSchema::register_numeric`],
/// then handed by reference to the loader. Unknown names are simply untyped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    numeric: BTreeSet<String>,
    text: BTreeSet<String>,
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ColumnSchema {
    /// Schema with no recognized columns.
    pub fn empty() -> Self {
        Self {
            numeric: BTreeSet::new(),
            text: BTreeSet::new(),
        }
    }

    /// Schema preloaded with the built-in annotation catalogue.
    pub fn builtin() -> Self {
        let numeric: BTreeSet<String> = BUILTIN_NUMERIC.iter().map(|s| (*s).to_string()).collect();
        let text = BUILTIN_TEXT
            .iter()
            .filter(|name| !numeric.contains(**name))
            .map(|s| (*s).to_string())
            .collect();
        Self { numeric, text }
    }

    pub fn is_numeric(&self, name: &str) -> bool {
        self.numeric.contains(name)
    }

    pub fn is_text(&self, name: &str) -> bool {
        self.text.contains(name)
    }

    /// Returns the declared kind of `name`, or `None` for unknown columns.
    pub fn classify(&self, name: &str) -> Option<ColumnKind> {
        if self.is_numeric(name) {
            Some(ColumnKind::Numeric)
        } else if self.is_text(name) {
            Some(ColumnKind::Text)
        } else {
            None
        }
    }

    /// Declares additional numeric columns.
    ///
    /// Idempotent. A name previously declared as text moves to the numeric set
    /// so the two sets stay disjoint. Returns how many names were newly added.
    pub fn register_numeric<I, S>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            self.text.remove(name);
            if self.numeric.insert(name.to_string()) {
                added += 1;
            }
        }
        added
    }

    /// Sorted numeric column names.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &str> {
        self.numeric.iter().map(String::as_str)
    }

    /// Sorted text column names.
    pub fn text_columns(&self) -> impl Iterator<Item = &str> {
        self.text.iter().map(String::as_str)
    }

    pub fn numeric_len(&self) -> usize {
        self.numeric.len()
    }

    pub fn text_len(&self) -> usize {
        self.text.len()
    }
}

/// Splits a user-supplied comma-separated column list.
pub fn parse_column_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_sets_are_disjoint() {
        let schema = ColumnSchema::builtin();
        for name in schema.numeric_columns() {
            assert!(!schema.is_text(name), "{name} is in both sets");
        }
    }

    #[test]
    fn builtin_classifies_known_columns() {
        let schema = ColumnSchema::default();
        assert_eq!(schema.classify("PopFreqMax"), Some(ColumnKind::Numeric));
        assert_eq!(schema.classify("TVC.counts"), Some(ColumnKind::Numeric));
        assert_eq!(schema.classify("Func.refGene"), Some(ColumnKind::Text));
        assert_eq!(schema.classify("M-CAP_pred"), Some(ColumnKind::Text));
        assert_eq!(schema.classify("Imaginary"), None);
    }

    #[test]
    fn register_numeric_is_idempotent() {
        let mut schema = ColumnSchema::empty();
        assert_eq!(schema.register_numeric(["QD", "AF"]), 2);
        assert_eq!(schema.register_numeric(["QD"]), 0);
        assert_eq!(schema.numeric_len(), 2);
    }

    #[test]
    fn register_numeric_moves_text_columns() {
        let mut schema = ColumnSchema::builtin();
        assert!(schema.is_text("Depth"));
        schema.register_numeric(["Depth"]);
        assert!(schema.is_numeric("Depth"));
        assert!(!schema.is_text("Depth"));
    }

    #[test]
    fn register_numeric_ignores_blank_names() {
        let mut schema = ColumnSchema::empty();
        assert_eq!(schema.register_numeric(["", "  "]), 0);
        assert_eq!(schema.numeric_len(), 0);
    }

    #[test]
    fn parse_column_list_trims_and_drops_empty() {
        assert_eq!(
            parse_column_list(" QD, AF ,,DP "),
            vec!["QD".to_string(), "AF".to_string(), "DP".to_string()]
        );
        assert!(parse_column_list("").is_empty());
    }
}
