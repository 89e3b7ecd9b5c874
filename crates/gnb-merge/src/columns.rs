//! Column names of the GISAID sources and NCBI targets.

// GISAID upload / download (machine headers)
pub const ACCESSION_ID: &str = "covv_accession_id";
pub const ORIGINATING_LAB: &str = "covv_orig_lab";
pub const COLLECTION_DATE: &str = "covv_collection_date";
pub const LOCATION: &str = "covv_location";
pub const PATIENT_AGE: &str = "covv_patient_age";
pub const GENDER: &str = "covv_gender";
pub const PASSAGE: &str = "covv_passage";

// GISAID upload (label row)
pub const SEQUENCING_TECHNOLOGY: &str = "Sequencing technology";
pub const ASSEMBLY_METHOD: &str = "Assembly method";

// NCBI BioSample attributes.tsv
pub const ATTRIBUTE_ACCESSION: &str = "accession";

// NCBI BioSample template
pub const SAMPLE_NAME: &str = "*sample_name";
pub const SAMPLE_TITLE: &str = "sample_title";
pub const BIOPROJECT_ACCESSION: &str = "bioproject_accession";
pub const ORGANISM: &str = "*organism";
pub const ISOLATE: &str = "isolate";
pub const DESCRIPTION: &str = "description";
pub const COLLECTED_BY: &str = "*collected_by";
pub const SAMPLE_COLLECTION_DATE: &str = "*collection_date";
pub const GEO_LOC_NAME: &str = "*geo_loc_name";
pub const HOST: &str = "*host";
pub const HOST_DISEASE: &str = "*host_disease";
pub const ISOLATION_SOURCE: &str = "*isolation_source";
pub const LAT_LON: &str = "*lat_lon";
pub const HOST_AGE: &str = "host_age";
pub const HOST_SEX: &str = "host_sex";
pub const PASSAGE_HISTORY: &str = "passage_history";

// NCBI SRA metadata template
pub const BIOSAMPLE_ACCESSION: &str = "biosample_accession";
pub const LIBRARY_ID: &str = "library_ID";
pub const TITLE: &str = "title";
pub const LIBRARY_STRATEGY: &str = "library_strategy";
pub const LIBRARY_SOURCE: &str = "library_source";
pub const LIBRARY_SELECTION: &str = "library_selection";
pub const LIBRARY_LAYOUT: &str = "library_layout";
pub const PLATFORM: &str = "platform";
pub const INSTRUMENT_MODEL: &str = "instrument_model";
pub const DESIGN_DESCRIPTION: &str = "design_description";
pub const FILETYPE: &str = "filetype";
pub const FILENAME: &str = "filename";
pub const FILENAME2: &str = "filename2";
