//! The three instruction templates of the coder agent.
//!
//! Two generation templates (one per library family) and one repair
//! template. Each encodes the structural contract the emitted script must
//! follow as a fixed ordered checklist; the checklists are instructions to
//! the model, and their violation is detected downstream by execution, not
//! here.

use crate::agents::LibraryFamily;
use crate::prompts::payload::{PromptTemplate, SectionKind, TemplateSection};

const CODER_SYSTEM_PROMPT: &str =
    "You are an expert Python developer with deep experience in anomaly detection libraries.";

/// Generation template for PyOD (tabular/vector anomaly detection).
static PYOD_GENERATION: PromptTemplate = PromptTemplate {
    name: "pyod_generation",
    system: CODER_SYSTEM_PROMPT,
    sections: &[
        TemplateSection {
            kind: SectionKind::Objective,
            body: r#"Your task is to:
1. Use the provided official documentation content for `{algorithm}` to understand how to use the specified algorithm class, including initialization, training, and prediction methods.
2. Write only executable Python code for anomaly detection using PyOD and do not include any explanations or descriptions.
3. Base your code strictly on the following official documentation excerpt."#,
        },
        TemplateSection {
            kind: SectionKind::Documentation,
            body: r#"--- BEGIN DOCUMENTATION ---
{documentation}
--- END DOCUMENTATION ---"#,
        },
        TemplateSection {
            kind: SectionKind::Checklist,
            body: r#"The code should:
(1) Import sys and os, and include the command `sys.path.append(os.path.abspath(os.path.join(os.path.dirname(__file__), '..')))` at the head.
(2) Import the loading utility with `from data_loader.data_loader import DataLoader` after (1).
(3) Initialize the loaders with `dataloader_train = DataLoader(filepath = {train_path}, store_script=True, store_path = 'train_data_loader.py')` and `dataloader_test = DataLoader(filepath = {test_path}, store_script=True, store_path = 'test_data_loader.py')`.
(4) Use `X_train, y_train = dataloader_train.load_data(split_data=False)` and `X_test, y_test = dataloader_test.load_data(split_data=False)` to produce the variables X_train, y_train, X_test, y_test.
(5) Initialize the specified algorithm `{algorithm}` strictly following the provided documentation and train the model with `X_train`.
(6) Determine whether the following parameters `{parameters}` apply to this initialization function and, if so, add their values to the call.
(7) Use `.decision_scores_` on `X_train` for training outlier scores and `.decision_function(X_test)` for test outlier scores, then calculate AUROC (Area Under the Receiver Operating Characteristic Curve) and AUPRC (Area Under the Precision-Recall Curve) against the true labels.
(8) Record the AUROC and AUPRC in variables and print them in the following format:
    AUROC:\s*(\d+.\d+)
    AUPRC:\s*(\d+.\d+)
(9) Record the points whose prediction failed and print each with its true label in the following format:
    `Failed prediction at point [xx,xx,xx...] with true label xx` Use `.tolist()` to convert each point to an array."#,
        },
        TemplateSection {
            kind: SectionKind::Constraints,
            body: r#"IMPORTANT:
- Strictly follow steps (2)-(9) to load the data from `{train_path}` and `{test_path}`.
- Do NOT input optional or incorrect parameters."#,
        },
    ],
};

/// Generation template for PyGOD (graph anomaly detection).
static PYGOD_GENERATION: PromptTemplate = PromptTemplate {
    name: "pygod_generation",
    system: CODER_SYSTEM_PROMPT,
    sections: &[
        TemplateSection {
            kind: SectionKind::Objective,
            body: r#"Your task is to:
1. Use the provided official documentation content for `{algorithm}` to understand how to use the specified algorithm class, including initialization, training, and prediction methods.
2. Write only executable Python code for anomaly detection using PyGOD and do not include any explanations or descriptions.
3. Base your code strictly on the following official documentation excerpt."#,
        },
        TemplateSection {
            kind: SectionKind::Documentation,
            body: r#"--- BEGIN DOCUMENTATION ---
{documentation}
--- END DOCUMENTATION ---"#,
        },
        TemplateSection {
            kind: SectionKind::Checklist,
            body: r#"The code should:
(1) Import sys, os, torch, and include the command `sys.path.append(os.path.abspath(os.path.join(os.path.dirname(__file__), '..')))` and `from pygod.detector import {algorithm}`.
(2) Load training and test data using `torch.load` with parameter `weights_only=False` from the file paths `{train_path}` and `{test_path}` respectively.
(3) Convert labels in the loaded data by executing:
    `train_data.y = (train_data.y != 0).long()`
    `test_data.y = (test_data.y != 0).long()`
(4) Initialize the specified algorithm `{algorithm}` with the provided parameters `{parameters}` (if applicable) strictly following the documentation excerpt.
(5) Train the model using `model.fit(train_data)`.
(6) Predict on the test data using `pred, score = model.predict(test_data, return_score=True)`.
(7) Extract the true labels and corresponding scores using the test mask:
    `true_labels = test_data.y[test_data.test_mask]`
    `score = score[test_data.test_mask]`
(8) Calculate AUROC using `roc_auc_score` and AUPRC using `average_precision_score` from sklearn.metrics.
(9) Print the AUROC and AUPRC in the following format:
    AUROC:\s*(\d+.\d+)
    AUPRC:\s*(\d+.\d+)"#,
        },
        TemplateSection {
            kind: SectionKind::Constraints,
            body: r#"IMPORTANT:
- Strictly follow steps (2)-(9) to load the data from `{train_path}` and `{test_path}`.
- Do NOT include any additional or incorrect parameters."#,
        },
    ],
};

/// Repair template: failing source + runtime error + documentation in,
/// complete replacement script out.
static REPAIR: PromptTemplate = PromptTemplate {
    name: "repair",
    system: CODER_SYSTEM_PROMPT,
    sections: &[
        TemplateSection {
            kind: SectionKind::PriorCode,
            body: r#"Here is the original code that raised an error:
--- Original Code ---
{code}"#,
        },
        TemplateSection {
            kind: SectionKind::ErrorReport,
            body: r#"--- Error Message ---
{error_message}"#,
        },
        TemplateSection {
            kind: SectionKind::Documentation,
            body: r#"Official documentation for `{algorithm}`:
--- BEGIN DOCUMENTATION ---
{documentation}
--- END DOCUMENTATION ---"#,
        },
        TemplateSection {
            kind: SectionKind::Constraints,
            body: r#"Task:
1. Analyse the error and fix it strictly according to the documentation.
2. Output the **complete** corrected script, not a diff or patch.
3. Output **executable** Python ONLY, no comments/explanations."#,
        },
    ],
};

/// Returns the generation template for a library family.
pub fn generation_template(family: LibraryFamily) -> &'static PromptTemplate {
    match family {
        LibraryFamily::PyOd => &PYOD_GENERATION,
        LibraryFamily::PyGod => &PYGOD_GENERATION,
    }
}

/// Returns the repair template.
pub fn repair_template() -> &'static PromptTemplate {
    &REPAIR
}
