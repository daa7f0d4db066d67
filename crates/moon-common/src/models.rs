//! Per-kind model allow-lists.

use crate::request::Kind;

pub const FORECAST_MODELS: &[&str] = &[
    "Ons_preveolico",
    "arpege_glo",
    "chimera_as",
    "chimera_dev",
    "csv_fit",
    "ct2w15_as",
    "ct2w15_glo",
    "ct2w40_as",
    "ct_near_as",
    "ctss_icon_glo",
    "ecmwf_as",
    "ecmwf_fct",
    "ecmwfe_as",
    "ecmwfe_as_bc",
    "efvm",
    "eta40_as",
    "eta_as",
    "fct_glo",
    "geps_glo",
    "gfs_glo",
    "gfsai_glo",
    "gfswave_glo",
    "gfswave_gsouth",
    "hycom_as",
    "icon_glo",
    "mercartor_as",
    "meteorologist",
    "meteorologist_hookgrid",
    "mlwets",
    "mgb",
    "mgb_extractions",
    "mgb_rs",
    "opticalflow_sad",
    "pestana",
    "pirambeira",
    "rap_cns",
    "regcm40_as",
    "silam_glo",
    "storm_lightning_as",
    "tigre",
    "ukmo_as",
    "w27a_as",
    "w27b_as",
    "w9p5a_as",
    "wcpt_as",
    "wets",
    "wets_ma",
    "wets_rs",
    "wets_sc",
    "wets_sp",
    "wets_vparaiba",
    "wideam_co",
    "wsema_poa",
    "wsema_rs",
    "wsema_su",
    "ww3_as",
    "ww3_rj",
];

pub const OBSERVED_PRODUCTS: &[&str] = &[
    "2m_relative_humidity_max_24hrs",
    "2m_relative_humidity_max_over_24hrs",
    "2m_relative_humidity_min_24hrs",
    "2m_relative_humidity_min_over_24hrs",
    "abi-goes16",
    "abi-l2-acmf",
    "abi-l2-acmf-unidata",
    "abi-l2-aodf",
    "abi-l2-cmipf",
    "abi-l2-cmipf-unidata",
    "abi-l2-codf",
    "abi-l2-codf-unidata",
    "abi-l2-dsrf",
    "abi-l2-dsrf-new",
    "abi-l2-fdcf",
    "abi-l2-fdcf-unidata",
    "abi-l2-lstf",
    "abi-l2-lstf-unidata",
    "abi-l2-rrqpef",
    "abi-l2-rrqpef-unidata",
    "abi-l2-visibility",
    "cpc_glo",
    "ct_near_as",
    "ct_near_dev",
    "ct_near_merge",
    "ct_observed_as",
    "ct_observed_dsrf",
    "current_weather",
    "fnl_glo",
    "glm-l2-lcfa",
    "glm-l2-lcfa-unidata",
    "horus_historic",
    "merge_as",
    "merge_daily_as",
    "mergestorm_as",
    "mergestorm_br",
    "nrt_as",
    "radar_al1",
    "radar_ara",
    "radar_arma10v4",
    "radar_arma11v4",
    "radar_arma1v4",
    "radar_arma3v4",
    "radar_arma4v4",
    "radar_arma5v4",
    "radar_arma6v4",
    "radar_arma7v4",
    "radar_arma8v4",
    "radar_arma9v4",
    "radar_ar01v4",
    "radar_ar05v4",
    "radar_ar07v4",
    "radar_ar08v4",
    "radar_braa",
    "radar_brbv",
    "radar_brcp",
    "radar_brcz",
    "radar_brgv",
    "radar_brni",
    "radar_brpc",
    "radar_brqa",
    "radar_brrr",
    "radar_brsn",
    "radar_brsr",
    "radar_brtt",
    "radar_brua",
    "radar_brsr",
    "radar_bv1",
    "radar_bz22",
    "radar_cgc",
    "radar_chc",
    "radar_co_bgt",
    "radar_co_crmg",
    "radar_co_crz",
    "radar_co_gvr",
    "radar_co_mcq",
    "radar_co_sa",
    "radar_co_se",
    "radar_co_tbz",
    "radar_coand",
    "radar_cobar",
    "radar_cocar",
    "radar_cocor",
    "radar_comun",
    "radar_cosan",
    "radar_cotab",
    "radar_crj",
    "radar_cu00",
    "radar_cu01",
    "radar_cu04",
    "radar_cu05",
    "radar_cu07",
    "radar_cz1",
    "radar_gam",
    "radar_gf01",
    "radar_jg1",
    "radar_list",
    "radar_lnt",
    "radar_lon",
    "radar_mc1",
    "radar_mclc5",
    "radar_mcp",
    "radar_mig",
    "radar_mn1",
    "radar_mxca5",
    "radar_mxcc2",
    "radar_mxam5",
    "radar_mxqt3",
    "radar_ninu",
    "radar_pach",
    "radar_panm3",
    "radar_pbr",
    "radar_pco",
    "radar_pe1",
    "radar_poa",
    "radar_ptv",
    "radar_sf1",
    "radar_slu",
    "radar_sn1",
    "radar_spz",
    "radar_sr1",
    "radar_st1",
    "radar_stg",
    "radar_sv1",
    "radar_svlag",
    "radar_svana",
    "radar_svana60",
    "radar_svpar",
    "radar_svpar60",
    "radar_svmig",
    "radar_svmig60",
    "radar_svvic",
    "radar_svvic60",
    "radar_svzac",
    "radar_svzac60",
    "radar_tbt",
    "radar_tf1",
    "radar_tm1",
    "radar_ttba",
    "radar_ttpa2",
    "radar_ttul2",
    "radar_ua1",
    "radar_wpl",
    "real_as",
    "samet_daily_as",
    "samet_hourly_as",
    "samet_hourly_dev",
    "soil",
    "topo",
    "wildfire_collector",
];

pub const SEASONAL_REANALYSIS_MODELS: &[&str] = &[
    "Ons_preveolico",
    "canesm5_glo",
    "cfs_glo",
    "cfs_glo_daily",
    "cfsv2_glo",
    "chimera_subseas_as",
    "cmcc_subseas_glo",
    "csv_fit",
    "ct2s2w_as",
    "ct2w180_as",
    "ct2w180_glo",
    "ct2w180_interpol",
    "ct2w270_as",
    "ct2w270_glo",
    "ct2w270_interpol",
    "ct2w45_as",
    "ct2w45_glo",
    "ct2w45_interpol",
    "ct2w_clim",
    "ct2w_clim_dev",
    "ct4s_as",
    "ctclim",
    "ctss_glo",
    "dwd_subseas_glo",
    "eccc_subseas_glo",
    "ecmwf_fullrange",
    "ecmwf_subseas_glo",
    "ecmwfe46_glo",
    "gfdlspead_glo",
    "gefs_glo",
    "gem52nemo_glo",
    "jma_subseas_glo",
    "meteo_france_subseas_glo",
    "meteorologist",
    "naasgeos5v2_glo",
    "ncarccsm4_glo",
    "ncarcesm1_glo",
    "ncep_subseas_glo",
    "nmme_glo",
    "reference_config",
    "regcm_as",
    "ukmo_subseas_glo",
];

pub const CLIMATOLOGY_MODELS: &[&str] = &[
    "cfsr_glo",
    "cpc_glo",
    "era5_glo",
    "merge_as",
    "samet_daily_as",
];

/// Models accepted for a kind. Observed, radar and satellite requests share
/// the product list; seasonal and reanalysis share a list.
pub fn allowed_models(kind: Kind) -> &'static [&'static str] {
    match kind {
        Kind::Forecast => FORECAST_MODELS,
        Kind::Observed | Kind::Radar | Kind::Satellite => OBSERVED_PRODUCTS,
        Kind::Seasonal | Kind::Reanalysis => SEASONAL_REANALYSIS_MODELS,
        Kind::Climatology => CLIMATOLOGY_MODELS,
    }
}

pub fn is_model_allowed(kind: Kind, model: &str) -> bool {
    allowed_models(kind).contains(&model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_lists() {
        assert!(is_model_allowed(Kind::Radar, "radar_poa"));
        assert!(is_model_allowed(Kind::Satellite, "abi-l2-cmipf"));
        assert!(is_model_allowed(Kind::Reanalysis, "cfs_glo"));
        assert!(is_model_allowed(Kind::Climatology, "era5_glo"));
    }

    #[test]
    fn test_model_from_another_kind_is_rejected() {
        assert!(is_model_allowed(Kind::Forecast, "gfs_glo"));
        assert!(!is_model_allowed(Kind::Climatology, "gfs_glo"));
        assert!(!is_model_allowed(Kind::Observed, "ecmwf_as"));
    }
}
