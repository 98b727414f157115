use cvbot::process;

cvbot_functions::web!(process);
