//! Static table schemas
//!
//! Column sets and their JSON description dictionaries for the
//! participants, sessions and scans tables. These ship as fixed
//! configuration; nothing here is inferred from data. The scans
//! column set depends on the modality family (MR, ophthalmic/other
//! optical, microscopy).

use serde_json::{json, Map, Value};

pub const PARTICIPANTS_HEADER: [&str; 5] = ["participant_id", "age", "sex", "modalities", "body_parts"];

pub const SESSIONS_HEADER: [&str; 4] = ["session_id", "study_uid", "acquisition_date", "radiology_report"];

pub const SCANS_MR_HEADER: [&str; 44] = [
    "scan_file",
    "BodyPart",
    "Modality",
    "SeriesDescription",
    "SeriesNumber",
    "PixelSpacing",
    "RepetitionTime",
    "EchoTime",
    "InversionTime",
    "SliceThickness",
    "SpacingBetweenSlices",
    "SeriesInstanceUID",
    "MRAcquisitionType",
    "MagneticFieldStrength",
    "ScanningSequence",
    "SequenceVariant",
    "ScanOptions",
    "SequenceName",
    "SliceEncodingDirection",
    "FlipAngle",
    "EchoNumbers",
    "EchoTrainLength",
    "ImagedNucleus",
    "ImagingFrequency",
    "InPlanePhaseEncodingDirection",
    "NumberOfPhaseEncodingSteps",
    "PercentPhaseFieldOfView",
    "PercentSampling",
    "PhotometricInterpretation",
    "PixelBandwidth",
    "SAR",
    "SamplesPerPixel",
    "Manufacturer",
    "ManufacturerModelName",
    "ReceiveCoilName",
    "TransmitCoilName",
    "PulseSequenceDetails",
    "PulseSequenceName",
    "SliceTiming",
    "WindowCenter",
    "WindowWidth",
    "SpecificCharacterSet",
    "SoftwareVersions",
    "note",
];

/// Ophthalmic / secondary-capture / other optical modalities
pub const SCANS_OP_HEADER: [&str; 12] = [
    "scan_file",
    "BodyPart",
    "SeriesNumber",
    "SeriesInstanceUID",
    "Manufacturer",
    "ManufacturerModelName",
    "Modality",
    "Columns",
    "Rows",
    "PhotometricInterpretation",
    "Laterality",
    "note",
];

/// Microscopy modalities
pub const SCANS_MICR_HEADER: [&str; 13] = [
    "scan_file",
    "BodyPart",
    "SeriesNumber",
    "SeriesInstanceUID",
    "Manufacturer",
    "ManufacturerModelName",
    "Modality",
    "Columns",
    "Rows",
    "PhotometricInterpretation",
    "ImagedVolumeHeight",
    "ImagedVolumeWidth",
    "note",
];

pub fn participants_fields() -> Value {
    json!({
        "participant_id": {
            "LongName": "Participant ID",
            "Description": "A unique identifier for each participant in the study."
        },
        "age": {
            "LongName": "Age",
            "Description": "The age of the participant in years relative to the date of birth.",
            "Units": "years"
        },
        "sex": {
            "LongName": "Sex",
            "Description": "The sex of the participant as reported by the participant.",
            "Levels": {
                "M": "male",
                "F": "female"
            }
        },
        "modalities": {
            "LongName": "Modalities",
            "Description": "The imaging modalities used in the study."
        },
        "body_parts": {
            "LongName": "Body Parts",
            "Description": "The body parts imaged in the study"
        }
    })
}

pub fn sessions_fields() -> Value {
    json!({
        "session_id": {
            "LongName": "Session ID",
            "Description": "A unique identifier for each imaging session in the study."
        },
        "study_uid": {
            "LongName": "Study UID",
            "Description": "A unique identifier for the study that the session belongs to."
        },
        "acquisition_date": {
            "LongName": "Acquisition Date and Time",
            "Description": "The date and time when the imaging session was acquired."
        },
        "radiology_report": {
            "LongName": "Radiology Report",
            "Description": "A report containing the interpretation and findings of the imaging session by a radiologist."
        }
    })
}

pub fn scans_mr_fields() -> Value {
    json!({
        "scan_file": {
            "LongName": "Scan File",
            "Description": "The file name of the scan"
        },
        "BodyPart": {
            "LongName": "Body Part Examined Attribute Tag (0018,0015)",
            "Description": "The part of the body examined in the scan.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/general-series/00180015"
        },
        "Modality": {
            "LongName": "Acquisition Modality (0008,0060)",
            "Description": "Type of device, process or method that originally acquired the data.",
            "TermURL": "https://dicom.innolitics.com/ciods/segmentation/general-series/00080060"
        },
        "SeriesDescription": {
            "LongName": "Series Description (0008,103E)",
            "Description": "A description of the series.",
            "TermURL": "https://dicom.innolitics.com/ciods/ct-image/general-series/0008103e"
        },
        "SeriesNumber": {
            "LongName": "Series Number Attribute Tag (0020,0011)",
            "Description": "A number that identifies the series.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/general-series/00200011"
        },
        "PixelSpacing": {
            "LongName": "Pixel Spacing (0028,0030)",
            "Description": "Physical distance between the center of each pixel, specified by a numeric pair - adjacent row spacing (delimiter) adjacent column spacing in mm.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00280030"
        },
        "RepetitionTime": {
            "LongName": "Repetition Time (0018,0080)",
            "Description": "Time in milliseconds between the beginning of a pulse sequence and the beginning of the succeeding pulse sequence.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00180080"
        },
        "EchoTime": {
            "LongName": "Echo Time (0018,0081)",
            "Description": "Time in milliseconds between the middle of the excitation pulse and the peak of the echo produced.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00180081"
        },
        "InversionTime": {
            "LongName": "Inversion Time (0018,0082)",
            "Description": "Time in milliseconds after the inversion pulse.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00180082"
        },
        "SliceThickness": {
            "LongName": "Slice Thickness (0018,0050)",
            "Description": "Nominal slice thickness, in mm.",
            "TermURL": "https://dicom.innolitics.com/ciods/rt-dose/image-plane/00180050"
        },
        "SpacingBetweenSlices": {
            "LongName": "Spacing Between Slices (0018,0088)",
            "Description": "Spacing between slices, in mm, measured from the center of each slice.",
            "TermURL": "https://dicom.innolitics.com/ciods/ct-performed-procedure-protocol/performed-ct-reconstruction/00189934/00180088"
        },
        "SeriesInstanceUID": {
            "LongName": "Series Instance UID Attribute Tag (0020,000E)",
            "Description": "A unique identifier for the series.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/general-series/0020000E"
        },
        "MRAcquisitionType": {
            "LongName": "MR Acquisition Type (0018,0023)",
            "Description": "Specifies the type of MR acquisition.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00180023"
        },
        "MagneticFieldStrength": {
            "LongName": "Magnetic Field Strength Attribute Tag (0018,0087)",
            "Description": "The strength of the magnetic field in Tesla.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00180087"
        },
        "ScanningSequence": {
            "LongName": "Scanning Sequence (0018,0020)",
            "Description": "Specifies the type of MR scanning sequence used.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00180020"
        },
        "SequenceVariant": {
            "LongName": "Sequence Variant (0018,0021)",
            "Description": "Specifies the variant of the scanning sequence.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00180021"
        },
        "ScanOptions": {
            "LongName": "Scan Options (0018,0022)",
            "Description": "Specifies additional options for the scanning sequence.",
            "TermURL": "https://dicom.innolitics.com/ciods/ct-image/ct-image/00180022"
        },
        "SequenceName": {
            "LongName": "Sequence Name (0018,0024)",
            "Description": "User-defined name for the combination of Scanning Sequence and Sequence Variant.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00180024"
        },
        "SliceEncodingDirection": {
            "LongName": "Slice Encoding Direction (0018,1312)",
            "Description": "Direction in which slices are encoded.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00181312"
        },
        "FlipAngle": {
            "LongName": "Flip Angle (0018,1314)",
            "Description": "Angle in degrees of the excitation pulse.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00181314"
        },
        "EchoNumbers": {
            "LongName": "Echo Numbers (0018,0086)",
            "Description": "Number of echoes in multi-echo sequences.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00180086"
        },
        "EchoTrainLength": {
            "LongName": "Echo Train Length (0018,0091)",
            "Description": "Number of lines in k-space acquired per excitation per image.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00180091"
        },
        "ImagedNucleus": {
            "LongName": "Imaged Nucleus (0018,0085)",
            "Description": "Nucleus that is resonant at the imaging frequency.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00180085"
        },
        "ImagingFrequency": {
            "LongName": "Imaging Frequency (0018,0084)",
            "Description": "Precession frequency in MHz of the nucleus being addressed.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00180084"
        },
        "InPlanePhaseEncodingDirection": {
            "LongName": "In-plane Phase Encoding Direction (0018,1312)",
            "Description": "The axis of phase encoding with respect to the image.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00181312"
        },
        "NumberOfPhaseEncodingSteps": {
            "LongName": "Number of Phase Encoding Steps (0018,0089)",
            "Description": "Number of phase encoding steps along the phase encoding direction before Fourier transformation.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00180089"
        },
        "PercentPhaseFieldOfView": {
            "LongName": "Percent Phase Field of View (0018,0094)",
            "Description": "Percentage of the field of view dimension in the phase direction relative to the frequency direction.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00180094"
        },
        "PercentSampling": {
            "LongName": "Percent Sampling (0018,0093)",
            "Description": "Percentage of sampling of data acquired in the frequency direction.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00180093"
        },
        "PhotometricInterpretation": {
            "LongName": "Photometric Interpretation (0028,0004)",
            "Description": "Specifies the intended interpretation of the pixel data.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00280004"
        },
        "PixelBandwidth": {
            "LongName": "Pixel Bandwidth (0018,0095)",
            "Description": "Bandwidth per pixel in the phase encode direction.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00180095"
        },
        "SAR": {
            "LongName": "Specific Absorption Rate (0018,1316)",
            "Description": "Rate at which RF energy is absorbed by the body during an MR procedure.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00181316"
        },
        "SamplesPerPixel": {
            "LongName": "Samples per Pixel (0028,0002)",
            "Description": "Number of samples stored for each pixel in the image.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00280002"
        },
        "Manufacturer": {
            "LongName": "Manufacturer (0008,0070)",
            "Description": "Manufacturer of the equipment that produced the composite instances.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00080070"
        },
        "ManufacturerModelName": {
            "LongName": "Manufacturer's Model Name Attribute Tag (0008,1090)",
            "Description": "The model name of the imaging equipment.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/general-equipment/00081090"
        },
        "ReceiveCoilName": {
            "LongName": "Receive Coil Name Attribute Tag (0018,1250)",
            "Description": "The name of the coil that receives the MR signal.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00181250"
        },
        "TransmitCoilName": {
            "LongName": "Transmit Coil Name (0018,1251)",
            "Description": "The name of the coil used in transmission.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00181251"
        },
        "PulseSequenceDetails": {
            "LongName": "Pulse Sequence Details (0018,9005)",
            "Description": "Provides details about the pulse sequence used in MR imaging.",
            "TermURL": "https://dicom.innolitics.com/ciods/enhanced-mr-image/mr-pulse-sequence/00189005"
        },
        "PulseSequenceName": {
            "LongName": "Pulse Sequence Name Attribute Tag (0018,9005)",
            "Description": "Name of the pulse sequence for annotation purposes",
            "TermURL": "https://dicom.innolitics.com/ciods/enhanced-mr-image/mr-pulse-sequence/00189005"
        },
        "SliceTiming": {
            "LongName": "Slice Timing (0018,0091)",
            "Description": "Time at which each slice was acquired.",
            "TermURL": "https://dicom.innolitics.com/ciods/mr-image/mr-image/00180091"
        },
        "WindowCenter": {
            "LongName": "Window Center (0028,1050)",
            "Description": "The center of the window used for display.",
            "TermURL": "https://dicom.innolitics.com/ciods/ct-image/voi-lut/00281050"
        },
        "WindowWidth": {
            "LongName": "Window Width (0028,1051)",
            "Description": "The width of the window used for display.",
            "TermURL": "https://dicom.innolitics.com/ciods/ct-image/voi-lut/00281051"
        },
        "SpecificCharacterSet": {
            "LongName": "Specific Character Set (0008,0005)",
            "Description": "Specifies the character set that is used to encode strings in the dataset.",
            "TermURL": "https://dicom.innolitics.com/ciods/ct-image/sop-common/00080005"
        },
        "SoftwareVersions": {
            "LongName": "Software Versions (0018,1020)",
            "Description": "A string that represents the version of the software.",
            "TermURL": "https://dicom.innolitics.com/ciods/ct-image/general-equipment/00181020"
        },
        "note": {
            "LongName": "Note",
            "Description": "Free-text note attached to the scan."
        }
    })
}

/// Restricts a field-description dictionary to the columns that
/// survived the all-missing drop
pub fn filtered_fields(fields: &Value, columns: &[String]) -> Value {
    let mut filtered = Map::new();
    if let Some(object) = fields.as_object() {
        for (key, value) in object {
            if columns.iter().any(|c| c == key) {
                filtered.insert(key.clone(), value.clone());
            }
        }
    }
    Value::Object(filtered)
}
